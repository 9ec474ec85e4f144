use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile a `$filter` expression and print the filter spec as JSON
    Compile {
        #[arg(long, help = "Filter expression, e.g. \"Price lt 20\"")]
        filter: String,

        #[arg(
            long,
            help = "If specified, writes the JSON to this file instead of stdout"
        )]
        output: Option<String>,
    },
    /// Plan a full OData query string and print the plan as JSON
    Query {
        /// Query string, e.g. "$filter=Price%20lt%2020&$top=10"
        query: String,

        #[arg(
            long,
            help = "If specified, writes the JSON to this file instead of stdout"
        )]
        output: Option<String>,
    },
    /// Render a `$filter` expression as a parameterized SQL fragment
    Sql {
        #[arg(long, help = "Filter expression")]
        filter: String,

        /// SQL dialect: "postgres" or "mysql"
        #[arg(long, default_value = "postgres")]
        dialect: String,

        #[arg(
            long,
            help = "If specified, writes the JSON to this file instead of stdout"
        )]
        output: Option<String>,
    },
}

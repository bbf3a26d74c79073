/// Search filters given on the command line: `sx_top_questions [intitle] [tagged]`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchArgs {
    pub intitle: Option<String>,
    pub tagged: Option<String>,
}

/// Parses positional search filters from an argument list (program name first)
pub fn parse_args<I>(args: I) -> SearchArgs
where
    I: IntoIterator<Item = String>,
{
    let mut positional = args.into_iter().skip(1);

    SearchArgs { intitle: positional.next(), tagged: positional.next() }
}

/// Parses positional search filters from the process arguments
pub fn search_args() -> SearchArgs {
    parse_args(std::env::args())
}

use clap::Parser;

/// Decodes the village profile spreadsheets and writes them as JSON.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file listing the sources to read. If not provided, the three
    /// villages of the published KKN spreadsheet are read.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path, optional) A single local file to read instead of the configured sources.
    #[clap(short, long, value_parser, conflicts_with = "config")]
    pub input: Option<String>,

    /// (default csv) The type of the file given with --input: csv or xlsx.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (default: the file name) The name of the village read from --input.
    #[clap(long, value_parser)]
    pub name: Option<String>,

    /// When using an Excel file, the name of the worksheet to read. The first worksheet is read
    /// otherwise.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (default 0) The index of the source to output, in the order of the configuration.
    #[clap(short, long, value_parser)]
    pub tab: Option<usize>,

    /// If passed as an argument, all the sources are written instead of a single one.
    #[clap(long, takes_value = false)]
    pub all: bool,

    /// If passed as an argument, the sources that cannot be read are skipped instead of failing
    /// the whole run. Overrides the aggregation set in the configuration.
    #[clap(long, takes_value = false)]
    pub partial: bool,

    /// (file path, 'stdout' or empty) Where to write the JSON report.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference report in JSON format. If provided, the output is compared
    /// against it and the differences are printed.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_and_config_conflict() {
        let res = Args::try_parse_from(["profildesa", "-i", "kuntang.csv", "-c", "desa.json"]);
        assert!(res.is_err());

        let args = Args::try_parse_from(["profildesa", "-i", "kuntang.csv", "--tab", "0"]).unwrap();
        assert_eq!(args.input.as_deref(), Some("kuntang.csv"));
        assert!(args.config.is_none());
    }
}

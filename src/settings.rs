use crate::clean::{CleanOptions, RowPolicy};
use crate::loader::LoadOptions;
use crate::util::DateOrder;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "sales_dashboard",
    about = "Aggregate a sales export into dashboard tables and a state CSV",
    version
)]
pub struct Settings {
    /// Sales export to read
    #[arg(long, default_value = "kayan.csv", env = "SALES_DASHBOARD_INPUT")]
    pub input: PathBuf,

    /// Text encoding of the input (WHATWG label)
    #[arg(long, default_value = "latin1")]
    pub encoding: String,

    /// Field delimiter
    #[arg(long, default_value_t = ',')]
    pub delimiter: char,

    /// What to do with rows whose amount, units or date cannot be parsed
    #[arg(long, value_enum, default_value_t = RowPolicy::Lenient)]
    pub mode: RowPolicy,

    /// Preferred reading of ambiguous numeric dates such as 3/4/2023
    #[arg(long, value_enum, default_value_t = DateOrder::MonthFirst)]
    pub date_order: DateOrder,

    /// Directory for sales_by_state.csv and dashboard.json
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Rows shown in each console table
    #[arg(long, default_value_t = 5)]
    pub preview_rows: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Only print previews, write no files
    #[arg(long)]
    pub no_export: bool,
}

impl Settings {
    /// Validated load options; the delimiter must be ASCII since it is
    /// matched against the decoded UTF-8 text byte by byte.
    pub fn load_options(&self) -> Result<LoadOptions, String> {
        if !self.delimiter.is_ascii() {
            return Err(format!("delimiter {:?} is not an ASCII character", self.delimiter));
        }
        Ok(LoadOptions {
            encoding: self.encoding.clone(),
            delimiter: self.delimiter as u8,
        })
    }

    pub fn clean_options(&self) -> CleanOptions {
        CleanOptions {
            policy: self.mode,
            date_order: self.date_order,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = Settings::parse_from(["sales_dashboard"]);
        assert_eq!(s.input, PathBuf::from("kayan.csv"));
        assert_eq!(s.mode, RowPolicy::Lenient);
        assert_eq!(s.date_order, DateOrder::MonthFirst);
        assert_eq!(s.load_options().unwrap().delimiter, b',');
        assert_eq!(s.load_options().unwrap().encoding, "latin1");
    }

    #[test]
    fn parses_modes() {
        let s = Settings::parse_from([
            "sales_dashboard",
            "--mode",
            "strict",
            "--date-order",
            "day-first",
            "--delimiter",
            ";",
        ]);
        assert_eq!(s.clean_options().policy, RowPolicy::Strict);
        assert_eq!(s.clean_options().date_order, DateOrder::DayFirst);
        assert_eq!(s.load_options().unwrap().delimiter, b';');
    }

    #[test]
    fn rejects_multibyte_delimiter() {
        let s = Settings::parse_from(["sales_dashboard", "--delimiter", "é"]);
        assert!(s.load_options().is_err());
    }
}

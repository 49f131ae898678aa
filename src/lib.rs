use std::ffi::OsString;
use std::num::IntErrorKind;

use clap::Parser;
use clap::error::ErrorKind;
use jiff::civil::Date;

pub mod error;
pub mod fetch;
pub mod format;

pub use error::{Error, UsageError};
pub use fetch::{RateQuery, RateService};
pub use format::{FormattedRateEntry, RatePair, format_rate, format_rates};

pub const PRIVAT_BASE_URL: &str = "https://api.privatbank.ua";

/// Most days that can be requested in one run.
pub const MAX_DAYS: i64 = 10;

/// Get the EUR and USD exchange rates from PrivatBank for the last few days.
///
/// One request is sent per day, all of them concurrently. Rates are the National Bank of
/// Ukraine sale and purchase rates as reported by PrivatBank.
#[derive(Parser, Debug)]
#[command(version)]
pub struct Cli {
    /// Number of days to retrieve, counting today (at most 10)
    #[arg(value_name = "DAYS", allow_negative_numbers = true, value_parser = parse_days)]
    pub days: i64,

    /// Indent the JSON output
    #[arg(short, long)]
    pub pretty: bool,

    /// Origin of the rate service
    #[arg(long, env = "PRIVAT_RATES_BASE_URL", default_value = PRIVAT_BASE_URL, hide = true)]
    pub base_url: String,
}

/// Parse a day count. Surrounding whitespace, a sign and `_` between digits are allowed.
///
/// Counts that do not fit in an `i64` saturate, so huge counts fail the range check and hugely
/// negative ones request nothing.
fn parse_days(value: &str) -> Result<i64, String> {
    let value = value.trim();
    let digits = value.strip_prefix(['+', '-']).unwrap_or(value);
    let well_formed = digits
        .split('_')
        .all(|group| !group.is_empty() && group.bytes().all(|b| b.is_ascii_digit()));
    if !well_formed {
        return Err(format!("`{value}` is not a whole number"));
    }

    match value.replace('_', "").parse::<i64>() {
        Ok(days) => Ok(days),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Ok(i64::MAX),
            IntErrorKind::NegOverflow => Ok(i64::MIN),
            _ => Err(e.to_string()),
        },
    }
}

/// Parse the command line and check the day count.
///
/// Zero or negative day counts are accepted and produce no requests.
pub fn parse_args<I, T>(args: I) -> Result<Cli, UsageError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut args = args.into_iter().map(Into::<OsString>::into).peekable();
    let bin = args
        .peek()
        .map(|arg| arg.to_string_lossy().into_owned())
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_owned());

    let cli = Cli::try_parse_from(args).map_err(|e| match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => UsageError::Clap(e),
        ErrorKind::InvalidValue | ErrorKind::ValueValidation => UsageError::InvalidNumber,
        _ => UsageError::Usage { bin },
    })?;

    if cli.days > MAX_DAYS {
        return Err(UsageError::TooManyDays { max: MAX_DAYS });
    }
    Ok(cli)
}

/// Fetch and reshape the rates for `args.days` days ending on `today`.
///
/// `today` labels the formatted entries as well as the requests, so both always agree.
pub async fn retrieve_rates(args: &Cli, today: Date) -> Result<Vec<FormattedRateEntry>, Error> {
    let service = RateService::open(&args.base_url)?;
    let raws = service.fetch_all(today, args.days).await?;
    format_rates(today, &raws)
}

/// Render entries as a JSON array.
pub fn render(entries: &[FormattedRateEntry], pretty: bool) -> serde_json::Result<String> {
    match pretty {
        false => serde_json::to_string(entries),
        true => serde_json::to_string_pretty(entries),
    }
}

#[cfg(test)]
mod tests {
    use crate::{MAX_DAYS, PRIVAT_BASE_URL, UsageError, fetch, parse_args};

    #[test]
    fn test_parse_args() {
        let cli = parse_args(["privat_rates", "3"]).unwrap();
        assert_eq!(cli.days, 3);
        assert!(!cli.pretty);

        assert_eq!(parse_args(["privat_rates", "10"]).unwrap().days, MAX_DAYS);
        assert_eq!(parse_args(["privat_rates", "0"]).unwrap().days, 0);
        assert_eq!(parse_args(["privat_rates", "-2"]).unwrap().days, -2);
        assert!(parse_args(["privat_rates", "--pretty", "1"]).unwrap().pretty);
    }

    #[test]
    fn test_parse_loose_numbers() {
        assert_eq!(parse_args(["privat_rates", " 3 "]).unwrap().days, 3);
        assert_eq!(parse_args(["privat_rates", "+4"]).unwrap().days, 4);
        assert_eq!(parse_args(["privat_rates", "1_0"]).unwrap().days, 10);
        assert_eq!(parse_args(["privat_rates", "007"]).unwrap().days, 7);

        // Too small for an i64 still means "no days"
        assert_eq!(
            parse_args(["privat_rates", "-99999999999999999999"])
                .unwrap()
                .days,
            i64::MIN
        );
        assert!(fetch::queries(jiff::civil::date(2024, 5, 10), i64::MIN).is_empty());
    }

    #[test]
    fn test_base_url_default() {
        // Skip when the environment overrides the default
        if std::env::var_os("PRIVAT_RATES_BASE_URL").is_none() {
            let cli = parse_args(["privat_rates", "1"]).unwrap();
            assert_eq!(cli.base_url, PRIVAT_BASE_URL);
        }
        let cli = parse_args(["privat_rates", "--base-url", "http://localhost:1", "1"]).unwrap();
        assert_eq!(cli.base_url, "http://localhost:1");
    }

    #[test]
    fn test_rejected_args() {
        assert!(matches!(
            parse_args(["privat_rates", "11"]),
            Err(UsageError::TooManyDays { max: 10 })
        ));
        assert!(matches!(
            parse_args(["privat_rates", "99999999999999999999"]),
            Err(UsageError::TooManyDays { max: 10 })
        ));
        assert!(matches!(
            parse_args(["privat_rates", "1_1"]),
            Err(UsageError::TooManyDays { max: 10 })
        ));
        for invalid in ["abc", "2.5", "+", "1__0", "_1", "1_", "1 0"] {
            assert!(
                matches!(
                    parse_args(["privat_rates", invalid]),
                    Err(UsageError::InvalidNumber)
                ),
                "accepted {invalid:?}"
            );
        }
        assert!(matches!(
            parse_args(["privat_rates"]),
            Err(UsageError::Usage { .. })
        ));
        assert!(matches!(
            parse_args(["privat_rates", "1", "2"]),
            Err(UsageError::Usage { .. })
        ));
        assert!(matches!(
            parse_args(["privat_rates", "--help"]),
            Err(UsageError::Clap(_))
        ));
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            UsageError::TooManyDays { max: 10 }.to_string(),
            "Error: Number of days should not exceed 10."
        );
        assert_eq!(
            UsageError::InvalidNumber.to_string(),
            "Error: Invalid input. Please enter a valid number of days."
        );
        assert_eq!(
            UsageError::Usage {
                bin: "privat_rates".to_owned()
            }
            .to_string(),
            "Usage: privat_rates <DAYS>"
        );
    }
}

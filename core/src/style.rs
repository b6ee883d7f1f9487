use colored::{Color, ColoredString, Colorize};

use crate::testing::{RunSummary, Status};

#[macro_export]
macro_rules! print_success {
    ($fmt:literal, $($e:tt)*) => {
        use ::colored::Colorize as _;
        println!("{}", format!($fmt, $($e)*).green())
    }
}

pub fn is_truecolor_supported() -> bool {
    let Ok(v) = std::env::var("COLORTERM") else {
        return false;
    };
    matches!(v.as_str(), "truecolor" | "24bit")
}

pub trait ColorTheme {
    fn color(&self) -> Color;
}

impl ColorTheme for log::Level {
    fn color(&self) -> Color {
        use log::Level::*;
        match self {
            Error => Color::BrightRed,
            Warn => Color::BrightYellow,
            Info => Color::Cyan,
            Debug => Color::Magenta,
            Trace => Color::Blue,
        }
    }
}

impl ColorTheme for Status {
    fn color(&self) -> Color {
        use Status::*;
        if !self::is_truecolor_supported() {
            return match self {
                Ok => Color::Green,
                Wrong => Color::Yellow,
                TimeLimit => Color::Red,
            };
        }

        match self {
            Ok => Color::TrueColor {
                r: 30,
                g: 180,
                b: 40,
            },
            Wrong => Color::TrueColor {
                r: 210,
                g: 138,
                b: 4,
            },
            TimeLimit => Color::TrueColor {
                r: 220,
                g: 42,
                b: 42,
            },
        }
    }
}

pub fn status_icon(status: Status) -> ColoredString {
    let fg = if is_truecolor_supported() {
        Color::TrueColor {
            r: 255,
            g: 255,
            b: 255,
        }
    } else {
        Color::BrightBlack
    };
    format!(" {} ", status)
        .on_color(status.color())
        .bold()
        .color(fg)
}

/// One line summary of a run. Written to stderr so that stdout stays a clean record stream.
pub fn summary_line(summary: &RunSummary) -> String {
    let bar = "-".repeat(5);
    let total = summary.outcomes.len();
    let count = summary.count_by_status();
    let num_passed = count.get(&Status::Ok).copied().unwrap_or(0);

    let msg = if total == 0 {
        "No testcases were run".yellow().to_string()
    } else if summary.all_ok() {
        format!("All {} testcases passed", total).green().to_string()
    } else {
        let detail = [Status::Wrong, Status::TimeLimit]
            .into_iter()
            .filter_map(|s| count.get(&s).map(|&n| (s, n)))
            .map(|(s, n)| format!("{}{}{}", status_icon(s), "x".dimmed(), n.to_string().bold()))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "{} ({})",
            format!("{}/{} testcases passed", num_passed, total).bright_red(),
            detail
        )
    };

    let mut notes = Vec::new();
    if summary.abandoned_groups > 0 {
        notes.push(format!("{} group(s) abandoned", summary.abandoned_groups));
    }
    if summary.halted {
        notes.push("halted on wrong answer".to_owned());
    }
    let notes = if notes.is_empty() {
        String::new()
    } else {
        format!(" [{}]", notes.join(", ")).dimmed().to_string()
    };

    format!("{} {}{} {}", bar, msg, notes, bar)
}

pub fn print_run_summary(summary: &RunSummary) {
    eprintln!("{}", summary_line(summary));
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::testing::Outcome;

    #[test]
    fn summary_mentions_failures_and_early_stops() {
        colored::control::set_override(false);

        let mut summary = RunSummary::default();
        assert_eq!(summary_line(&summary), "----- No testcases were run -----");

        summary.outcomes.push(Outcome::time_limit("1a.in"));
        summary.outcomes.push(Outcome::time_limit("1b.in"));
        summary.abandoned_groups = 1;
        assert_eq!(
            summary_line(&summary),
            "----- 0/2 testcases passed ( timelimit x2) [1 group(s) abandoned] -----"
        );
    }
}

use indexmap::IndexMap;

use crate::command::{BoundArguments, Command, CommandOutput, CommandResult};
use crate::core::error::DescriptorError;
use crate::core::value::ValueKind;
use crate::session::Grade;

pub fn grades_command() -> Result<Command, DescriptorError> {
    Command::builder("grades")
        .summary("list grades grouped by subject")
        .named("subject", ValueKind::Str, "")
        .build(grades)
}

fn grades(args: BoundArguments) -> CommandResult {
    let filter = args.str("subject")?.to_lowercase();
    let grades = args.session()?.borrow().grades()?;

    let mut by_subject: IndexMap<&str, Vec<&Grade>> = IndexMap::new();
    for grade in grades
        .iter()
        .filter(|g| g.subject.to_lowercase().contains(&filter))
    {
        by_subject.entry(grade.subject.as_str()).or_default().push(grade);
    }

    if by_subject.is_empty() {
        return Ok(CommandOutput::new("no grades"));
    }

    let lines: Vec<String> = by_subject
        .iter()
        .map(|(subject, grades)| {
            let values: Vec<&str> = grades.iter().map(|g| g.value.as_str()).collect();
            match weighted_average(grades) {
                Some(avg) => format!("{}: {}  (avg {:.2})", subject, values.join(", "), avg),
                None => format!("{}: {}", subject, values.join(", ")),
            }
        })
        .collect();

    Ok(CommandOutput::new(lines.join("\n")))
}

/// Numeric value of a grade mark: `4+` is 4.5, `4-` is 3.75.
/// Non-numeric marks (`np`, `+`, `-` on their own) have none.
pub fn grade_value(mark: &str) -> Option<f64> {
    let mark = mark.trim();
    let (digits, modifier) = match mark.strip_suffix('+') {
        Some(rest) => (rest, 0.5),
        None => match mark.strip_suffix('-') {
            Some(rest) => (rest, -0.25),
            None => (mark, 0.0),
        },
    };
    let base: u8 = digits.parse().ok()?;
    if !(1..=6).contains(&base) {
        return None;
    }
    Some(f64::from(base) + modifier)
}

fn weighted_average(grades: &[&Grade]) -> Option<f64> {
    let (sum, weights) = grades
        .iter()
        .filter(|g| g.weight > 0)
        .filter_map(|g| grade_value(&g.value).map(|v| (v, f64::from(g.weight))))
        .fold((0.0, 0.0), |(sum, weights), (v, w)| (sum + v * w, weights + w));

    if weights > 0.0 {
        Some(sum / weights)
    } else {
        None
    }
}

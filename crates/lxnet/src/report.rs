use colored::Colorize;
use lxnet_core::{Outcome, OutcomeStatus, Summary};

pub fn print_text(outcomes: &[Outcome]) {
    for outcome in outcomes {
        let (marker, comment) = match outcome.status() {
            OutcomeStatus::Success => ("✓".green(), outcome.comment().green()),
            OutcomeStatus::NoOp => ("·".dimmed(), outcome.comment().dimmed()),
            OutcomeStatus::Pending => ("~".yellow(), outcome.comment().yellow()),
            OutcomeStatus::Failure => ("✗".red(), outcome.comment().red()),
        };
        println!("{} {}: {}", marker, outcome.name().bold(), comment);

        for (slot, change) in outcome.changes().iter() {
            println!("    {}: {}", slot.cyan(), change);
        }
    }

    if outcomes.len() > 1 {
        println!();
        println!("{}", Summary::of(outcomes).to_string().bold());
    }
}

pub fn print_json(outcomes: &[Outcome]) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(outcomes)?);
    Ok(())
}

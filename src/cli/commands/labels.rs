//! Labels command implementation

use crate::anonymization::labels::{AVAILABLE_LABELS, DEFAULT_SELECTED_LABELS};
use clap::Args;

/// Arguments for the labels command
#[derive(Args, Debug)]
pub struct LabelsArgs {
    /// Only print the labels selected by default
    #[arg(long)]
    pub defaults: bool,
}

impl LabelsArgs {
    /// Execute the labels command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        for line in self.render() {
            println!("{line}");
        }
        Ok(0)
    }

    fn render(&self) -> Vec<String> {
        if self.defaults {
            return DEFAULT_SELECTED_LABELS.iter().map(|l| l.to_string()).collect();
        }
        AVAILABLE_LABELS
            .iter()
            .map(|label| {
                let marker = if DEFAULT_SELECTED_LABELS.contains(label) {
                    '*'
                } else {
                    ' '
                };
                format!("{marker} {label}")
            })
            .collect()
    }
}

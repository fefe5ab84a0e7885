use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use ureq::{Agent, AgentBuilder};

pub fn progress_bar(len: u64) -> ProgressBar {
    ProgressBar::new(len).with_style(
        ProgressStyle::with_template("[{elapsed_precise}] {human_pos} {percent}% ({per_sec})")
            .expect("hardcoded"),
    )
}

pub fn agent() -> Agent {
    AgentBuilder::new()
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .timeout(Duration::from_secs(180))
        .build()
}

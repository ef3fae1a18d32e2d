use std::path::PathBuf;

use clap::Parser;
use tasklist_shared::SortKey;
use url::Url;

/// Terminal client for a remote task list.
#[derive(Debug, Parser)]
#[command(name = "tasklist", version)]
pub struct Args {
    /// Base URL of the task store.
    #[arg(long, env = "TASKLIST_STORE_URL", default_value = "http://127.0.0.1:3000")]
    pub store_url: Url,

    /// Field the store can sort by; `s` cycles through these. Repeatable.
    #[arg(
        long = "sort-field",
        value_name = "FIELD",
        default_values = ["dueDate", "createdOn", "title"]
    )]
    pub sort_fields: Vec<String>,

    /// Where log output goes while the terminal is in use.
    #[arg(long, env = "TASKLIST_LOG_FILE", default_value = "tasklist.log")]
    pub log_file: PathBuf,
}

impl Args {
    /// `Default` first, then each distinct configured field.
    pub fn sort_keys(&self) -> Vec<SortKey> {
        let mut keys = vec![SortKey::Default];
        for field in &self.sort_fields {
            let key: SortKey = field.parse().unwrap_or_default();
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }
}

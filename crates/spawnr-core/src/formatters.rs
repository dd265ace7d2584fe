/// Kubernetes object names are DNS labels: at most 63 characters.
const MAX_NAME_LENGTH: usize = 63;

/// Turns free-form user input into a valid job name, e.g. `"Nightly Backup_2"`
/// becomes `nightly-backup-2`. Falls back to `job` when nothing usable is left.
pub fn format_job_name(raw: &str) -> String {
    let name: String = raw
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '_' { '-' } else { c })
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect();

    let name = name.trim_matches('-');
    let name = &name[..name.len().min(MAX_NAME_LENGTH)];
    let name = name.trim_end_matches('-');

    if name.is_empty() {
        return "job".to_string();
    }

    name.to_string()
}

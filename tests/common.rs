use assert_cmd::{cargo::cargo_bin_cmd, Command};

/// Get a Command for distil with the config environment scrubbed
pub fn distil() -> Command {
    let mut cmd = cargo_bin_cmd!("distil");
    for key in [
        "DISTIL_WORKSPACE",
        "DISTIL_LEDGER",
        "DISTIL_ARCHIVE",
        "DISTIL_MAX_ENTRIES",
        "DISTIL_PIN_TAGS",
        "DISTIL_LOG",
    ] {
        cmd.env_remove(key);
    }
    cmd
}

/// Build a rendered entry block in the ledger's fixed record format
#[allow(dead_code)]
pub fn entry_block(date: &str, title: &str, source: &str, tags: &str) -> String {
    format!(
        "### [{date}] {title}\n\
         - Context: C\n\
         - Realization: R\n\
         - Decision Rule: D\n\
         - Evidence: E\n\
         - Confidence: medium\n\
         - Scope: S\n\
         - Next Action: N\n\
         - Source: `{source}`\n\
         - Tags: {tags}\n"
    )
}

//! Machine fingerprint used to bind licenses to a computer.

use std::process::Command;

/// Identifier used when the platform query fails.
const UNKNOWN_ID: &str = "UNKNOWN";

/// Fingerprint of this machine: `<OS prefix>|<machine id>`, upper-cased.
///
/// Prefixes are `WIN`, `LIN`, `MAC` and `UNK` for other systems.
pub fn machine_fingerprint() -> String {
    let os = std::env::consts::OS;
    let ident = match os {
        "windows" => windows_machine_guid(),
        "linux" => linux_machine_id(),
        "macos" => mac_platform_uuid(),
        _ => None,
    };
    format_fingerprint(os, ident.as_deref())
}

fn format_fingerprint(os: &str, ident: Option<&str>) -> String {
    let prefix = match os {
        "windows" => "WIN",
        "linux" => "LIN",
        "macos" => "MAC",
        _ => "UNK",
    };
    let ident = ident
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .unwrap_or(UNKNOWN_ID);
    format!("{}|{}", prefix, ident).to_uppercase()
}

fn command_output(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn linux_machine_id() -> Option<String> {
    std::fs::read_to_string("/etc/machine-id")
        .ok()
        .map(|id| id.trim().to_string())
}

fn windows_machine_guid() -> Option<String> {
    let out = command_output(
        "reg",
        &[
            "query",
            r"HKLM\SOFTWARE\Microsoft\Cryptography",
            "/v",
            "MachineGuid",
        ],
    )?;
    parse_reg_value(&out, "MachineGuid")
}

fn mac_platform_uuid() -> Option<String> {
    let out = command_output("ioreg", &["-rd1", "-c", "IOPlatformExpertDevice"])?;
    parse_ioreg_uuid(&out)
}

/// Extract a value from `reg query` output (`    Name    REG_SZ    value`).
fn parse_reg_value(output: &str, name: &str) -> Option<String> {
    output.lines().find_map(|line| {
        let mut fields = line.split_whitespace();
        if fields.next()? != name {
            return None;
        }
        fields.next()?;
        fields.next().map(str::to_string)
    })
}

/// Extract `IOPlatformUUID` from `ioreg` output.
fn parse_ioreg_uuid(output: &str) -> Option<String> {
    output
        .lines()
        .filter(|line| line.contains("IOPlatformUUID"))
        .find_map(|line| line.split_once('='))
        .map(|(_, value)| value.trim().trim_matches('"').to_string())
}

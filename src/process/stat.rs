//! Parsers for the per-process files under /proc.

use herakles_check_procs::ProcessStatus;
use once_cell::sync::Lazy;
use std::path::Path;

/// Get system clock ticks per second (usually 100, but can vary).
fn get_clk_tck() -> u64 {
    #[cfg(unix)]
    {
        // SAFETY: sysconf is safe to call with _SC_CLK_TCK
        // Returns -1 on error, 0 if undefined - both are handled by the > 0 check
        unsafe {
            let tck = libc::sysconf(libc::_SC_CLK_TCK);
            if tck > 0 {
                return tck as u64;
            }
        }
    }
    100
}

/// System clock ticks per second (for start time calculation).
pub static CLK_TCK: Lazy<u64> = Lazy::new(get_clk_tck);

/// Fields of /proc/<pid>/stat the check needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcStat {
    pub state: char,
    /// Start time in clock ticks since boot (field 22).
    pub start_ticks: u64,
}

/// Parses /proc/<pid>/stat content.
///
/// The command name (field 2) may contain spaces and parentheses, so fields
/// are counted from the last `)`.
pub fn parse_stat(content: &str) -> Option<ProcStat> {
    let rest = &content[content.rfind(')')? + 1..];
    let fields: Vec<&str> = rest.split_whitespace().collect();
    let state = fields.first()?.chars().next()?;
    // Field 22 is 19 positions after the state field (field 3)
    let start_ticks = fields.get(19)?.parse().ok()?;
    Some(ProcStat { state, start_ticks })
}

/// Maps a Linux state character to a process status class.
pub fn status_from_state(state: char) -> ProcessStatus {
    match state {
        'R' => ProcessStatus::Running,
        'S' | 'D' => ProcessStatus::Sleeping,
        'T' | 't' => ProcessStatus::Stopped,
        'Z' | 'X' | 'x' => ProcessStatus::Zombie,
        'I' | 'W' => ProcessStatus::Waiting,
        _ => ProcessStatus::Sleeping,
    }
}

/// Translates a Linux `wchan` symbol into the wait-state token the thread
/// filters understand.
///
/// Threads blocked in a futex wait are in a userland wait (`uwait`). Linux
/// has no separate symbol for userland rwlock waits, so `uwrlck` is never
/// produced. Other symbols are kept as they are; `0` means not waiting.
pub fn wait_state_from_wchan(wchan: &str) -> String {
    let wchan = wchan.trim();
    if wchan.is_empty() || wchan == "0" {
        String::new()
    } else if wchan.starts_with("futex") || wchan == "do_futex" {
        "uwait".to_string()
    } else {
        wchan.to_string()
    }
}

/// Splits NUL-separated /proc/<pid>/cmdline content into arguments.
pub fn parse_cmdline(content: &[u8]) -> Vec<String> {
    let mut args: Vec<String> = content
        .split(|&b| b == 0u8)
        .map(|s| String::from_utf8_lossy(s).into_owned())
        .collect();
    while args.last().is_some_and(|a| a.is_empty()) {
        args.pop();
    }
    args
}

/// Derives the command name from argv[0]: the basename, cut at its first `:`.
///
/// A rewritten process title (`sshd: root@pts/0`) is reduced to the text
/// before `": "` first, since its status part may itself contain `/`.
pub fn command_from_argv0(argv0: &str) -> Option<String> {
    let path = argv0.split(": ").next().unwrap_or(argv0).trim();
    let base = Path::new(path).file_name()?.to_str()?;
    let name = base.split(':').next().unwrap_or(base);
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Extracts the real uid from /proc/<pid>/status content.
pub fn parse_status_uid(content: &str) -> Option<u32> {
    content
        .lines()
        .find_map(|line| line.strip_prefix("Uid:"))
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|uid| uid.parse().ok())
}

/// Extracts the boot time (seconds since the epoch) from /proc/stat content.
pub fn parse_boot_time(content: &str) -> Option<i64> {
    content
        .lines()
        .find_map(|line| line.strip_prefix("btime"))
        .and_then(|rest| rest.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const STAT: &str = "812 (sshd) S 1 812 812 0 -1 4194560 1234 0 12 0 5 3 0 0 20 0 1 0 1500 16384000 1800 18446744073709551615";

    #[test]
    fn test_parse_stat() {
        let stat = parse_stat(STAT).unwrap();
        assert_eq!(stat.state, 'S');
        assert_eq!(stat.start_ticks, 1500);
    }

    #[test]
    fn test_parse_stat_with_parens_in_comm() {
        let content = "77 (weird) name) R 1 77 77 0 -1 0 0 0 0 0 0 0 0 0 20 0 1 0 4242 0 0";
        let stat = parse_stat(content).unwrap();
        assert_eq!(stat.state, 'R');
        assert_eq!(stat.start_ticks, 4242);
    }

    #[test]
    fn test_parse_stat_truncated() {
        assert!(parse_stat("1 (init) S 0 1").is_none());
        assert!(parse_stat("garbage").is_none());
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_from_state('R'), ProcessStatus::Running);
        assert_eq!(status_from_state('D'), ProcessStatus::Sleeping);
        assert_eq!(status_from_state('t'), ProcessStatus::Stopped);
        assert_eq!(status_from_state('Z'), ProcessStatus::Zombie);
        assert_eq!(status_from_state('I'), ProcessStatus::Waiting);
    }

    #[test]
    fn test_wait_state_from_wchan() {
        assert_eq!(wait_state_from_wchan("futex_do_wait"), "uwait");
        assert_eq!(wait_state_from_wchan("futex_wait_queue_me\n"), "uwait");
        assert_eq!(wait_state_from_wchan("do_futex"), "uwait");
        assert_eq!(wait_state_from_wchan("ep_poll"), "ep_poll");
        assert_eq!(wait_state_from_wchan("0"), "");
        assert_eq!(wait_state_from_wchan(""), "");
    }

    #[test]
    fn test_parse_cmdline() {
        let args = parse_cmdline(b"/usr/sbin/sshd\0-D\0\0");
        assert_eq!(args, vec!["/usr/sbin/sshd".to_string(), "-D".to_string()]);
        assert!(parse_cmdline(b"").is_empty());
    }

    #[test]
    fn test_command_from_argv0() {
        assert_eq!(command_from_argv0("/usr/sbin/sshd").as_deref(), Some("sshd"));
        assert_eq!(command_from_argv0("sshd: root@pts/0").as_deref(), Some("sshd"));
        assert_eq!(command_from_argv0("nginx: worker process").as_deref(), Some("nginx"));
        assert_eq!(command_from_argv0("").as_deref(), None);
    }

    #[test]
    fn test_command_from_argv0_basename_before_colon() {
        assert_eq!(command_from_argv0("/opt/a:b/prog").as_deref(), Some("prog"));
        assert_eq!(command_from_argv0("/usr/bin/tool:extra").as_deref(), Some("tool"));
        assert_eq!(command_from_argv0("postgres: checkpointer").as_deref(), Some("postgres"));
    }

    #[test]
    fn test_parse_status_uid() {
        let content = "Name:\tsshd\nState:\tS (sleeping)\nUid:\t1000\t1000\t1000\t1000\n";
        assert_eq!(parse_status_uid(content), Some(1000));
        assert_eq!(parse_status_uid("Name:\tx\n"), None);
    }

    #[test]
    fn test_parse_boot_time() {
        let content = "cpu  1 2 3 4\nbtime 1700000000\nprocesses 42\n";
        assert_eq!(parse_boot_time(content), Some(1_700_000_000));
    }
}

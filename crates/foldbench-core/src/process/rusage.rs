//! Child reaping via wait4(2): exit classification, rusage, CPU quota.

use std::io;
use std::time::Duration;

use crate::bundle::ResourceUsage;

/// How a child process left the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitKind {
    /// Normal exit with the given status code.
    Exited(i32),
    /// Terminated by the given signal.
    Signaled(i32),
}

impl ExitKind {
    pub fn signal(self) -> Option<i32> {
        match self {
            ExitKind::Signaled(sig) => Some(sig),
            ExitKind::Exited(_) => None,
        }
    }
}

/// Exit classification plus resource usage for one reaped child.
#[derive(Debug, Clone, Copy)]
pub struct WaitOutcome {
    pub exit: ExitKind,
    pub usage: ResourceUsage,
}

/// Block until the child exits and collect its resource usage.
///
/// Uses wait4(2) directly instead of `Child::wait` so rusage and the
/// terminating signal are available even for signal-killed children.
pub fn wait_with_usage(pid: u32) -> io::Result<WaitOutcome> {
    let pid = pid as libc::pid_t;
    let mut status: libc::c_int = 0;
    let mut usage: libc::rusage = unsafe { std::mem::zeroed() };
    loop {
        let ret = unsafe { libc::wait4(pid, &mut status, 0, &mut usage) };
        if ret == pid {
            break;
        }
        let err = io::Error::last_os_error();
        if err.kind() == io::ErrorKind::Interrupted {
            continue;
        }
        return Err(err);
    }

    let exit = if libc::WIFSIGNALED(status) {
        ExitKind::Signaled(libc::WTERMSIG(status))
    } else {
        ExitKind::Exited(libc::WEXITSTATUS(status))
    };
    Ok(WaitOutcome {
        exit,
        usage: convert_usage(&usage),
    })
}

/// Apply an RLIMIT_CPU quota to an already-spawned child.
///
/// Exceeding the quota makes the kernel deliver SIGXCPU, which surfaces as
/// a signal termination in [`wait_with_usage`] and is reported as a
/// timeout by the runners.
pub fn set_cpu_limit(pid: u32, limit: Duration) -> io::Result<()> {
    let secs = limit.as_secs().max(1);
    let rlim = libc::rlimit {
        rlim_cur: secs,
        rlim_max: secs,
    };
    let ret = unsafe { libc::prlimit(pid as libc::pid_t, libc::RLIMIT_CPU, &rlim, std::ptr::null_mut()) };
    if ret != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

fn timeval_secs(tv: &libc::timeval) -> f64 {
    tv.tv_sec as f64 + tv.tv_usec as f64 / 1e6
}

fn convert_usage(ru: &libc::rusage) -> ResourceUsage {
    // ru_maxrss is in kilobytes on Linux.
    ResourceUsage {
        user_secs: timeval_secs(&ru.ru_utime).max(0.0),
        sys_secs: timeval_secs(&ru.ru_stime).max(0.0),
        max_rss_kb: (ru.ru_maxrss as i64).max(0),
    }
}

//! `src/fs/owner.rs`
//!
//! uid/gid to name lookups and the host name. Only ever called from the
//! foreground loop (render, startup): the libc lookups use static buffers.

use std::ffi::CStr;

/// Login name for `uid`, if the passwd database knows it.
#[must_use]
pub fn user_name(uid: u32) -> Option<String> {
    // SAFETY: getpwuid accepts any uid; the returned record is read before
    // any further passwd call can overwrite it.
    unsafe {
        let pw = libc::getpwuid(uid);
        if pw.is_null() || (*pw).pw_name.is_null() {
            return None;
        }
        CStr::from_ptr((*pw).pw_name)
            .to_str()
            .ok()
            .map(str::to_owned)
    }
}

/// Group name for `gid`, if the group database knows it.
#[must_use]
pub fn group_name(gid: u32) -> Option<String> {
    // SAFETY: same contract as `user_name`, for the group database.
    unsafe {
        let gr = libc::getgrgid(gid);
        if gr.is_null() || (*gr).gr_name.is_null() {
            return None;
        }
        CStr::from_ptr((*gr).gr_name)
            .to_str()
            .ok()
            .map(str::to_owned)
    }
}

/// Name of the user running the process.
#[must_use]
pub fn current_user_name() -> Option<String> {
    // SAFETY: getuid never fails.
    let uid = unsafe { libc::getuid() };
    user_name(uid)
}

#[must_use]
pub fn host_name() -> Option<String> {
    let mut buf = [0u8; 256];

    // SAFETY: the buffer is valid for `buf.len()` bytes and gethostname
    // writes at most that many.
    let rc = unsafe { libc::gethostname(buf.as_mut_ptr().cast::<libc::c_char>(), buf.len()) };
    if rc != 0 {
        return None;
    }

    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    std::str::from_utf8(&buf[..end]).ok().map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_is_known() {
        assert_eq!(user_name(0).as_deref(), Some("root"));
    }

    #[test]
    fn host_name_resolves() {
        assert!(host_name().is_some());
    }
}

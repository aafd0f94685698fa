//! Platform device rescan capability
//!
//! Opening a device node is usually enough for the kernel to notice a media
//! change. On Linux the partition table is also re-read with `BLKRRPART`.
//! Every failure here is expected (no media, busy disk, not a block device,
//! missing privileges) and is discarded by the caller.

use std::fs::File;
use std::io;
use std::path::Path;

/// Per-target rescan operation invoked on an already opened target
pub trait Rescan {
    fn rescan(&self, target: &Path, device: &File) -> io::Result<()>;
}

/// Rescan using the primitive available on the current platform
#[derive(Debug, Clone, Copy, Default)]
pub struct PlatformRescan;

#[cfg(target_os = "linux")]
mod ioctl {
    // BLKRRPART, _IO(0x12, 95) in <linux/fs.h>
    nix::ioctl_none!(blkrrpart, 0x12, 95);
}

impl Rescan for PlatformRescan {
    #[cfg(target_os = "linux")]
    fn rescan(&self, _target: &Path, device: &File) -> io::Result<()> {
        use std::os::unix::io::AsRawFd;

        // SAFETY: the descriptor stays open for the duration of the call
        // and BLKRRPART takes no argument.
        unsafe { ioctl::blkrrpart(device.as_raw_fd()) }
            .map(|_| ())
            .map_err(io::Error::from)
    }

    #[cfg(not(target_os = "linux"))]
    fn rescan(&self, _target: &Path, _device: &File) -> io::Result<()> {
        Ok(())
    }
}

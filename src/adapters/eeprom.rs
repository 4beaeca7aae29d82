//! Persistent storage adapter backing the [`EepromPort`].
//!
//! The controller board has no discrete EEPROM; the duration record lives
//! in a small NVS blob instead.  The adapter presents it as a flat,
//! offset-addressed byte region:
//!
//! - **`target_os = "espidf"`** — the region is cached in RAM and written
//!   through to an NVS blob (namespace `mouldbot`, key `timers`) on every
//!   write.  NVS commits are atomic, so a power cut mid-save leaves the
//!   previous record intact.
//! - **`not(target_os = "espidf")`** — RAM cache only, for host tests.
//!
//! Unwritten bytes read as `0xFF`, matching erased-flash convention — the
//! duration store sees that as a missing marker and installs defaults.

use crate::app::ports::EepromPort;
use crate::error::StorageError;
use log::info;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::warn;

/// Size of the emulated EEPROM region.  Larger than the duration record
/// so the layout can grow without a storage migration.
pub const EEPROM_LEN: usize = 32;

#[cfg(target_os = "espidf")]
const NVS_NAMESPACE: &[u8] = b"mouldbot\0";
#[cfg(target_os = "espidf")]
const NVS_KEY: &[u8] = b"timers\0";

pub struct EepromAdapter {
    cache: [u8; EEPROM_LEN],
}

impl EepromAdapter {
    /// Open the backing storage and pull the current region into the cache.
    pub fn new() -> Result<Self, StorageError> {
        #[cfg_attr(not(target_os = "espidf"), allow(unused_mut))]
        let mut adapter = Self {
            cache: [0xFF; EEPROM_LEN],
        };

        #[cfg(target_os = "espidf")]
        {
            // SAFETY: nvs_flash_init / nvs_flash_erase run from the single
            // main-task context before any concurrent NVS access.
            let ret = unsafe { nvs_flash_init() };
            if ret == ESP_ERR_NVS_NO_FREE_PAGES || ret == ESP_ERR_NVS_NEW_VERSION_FOUND {
                warn!("NVS: erasing and re-initialising flash partition");
                if unsafe { nvs_flash_erase() } != ESP_OK {
                    return Err(StorageError::IoError);
                }
                if unsafe { nvs_flash_init() } != ESP_OK {
                    return Err(StorageError::IoError);
                }
            } else if ret != ESP_OK {
                return Err(StorageError::IoError);
            }

            match adapter.load_blob() {
                Ok(true) => info!("EepromAdapter: region loaded from NVS"),
                Ok(false) => info!("EepromAdapter: no stored region, starting blank"),
                Err(e) => return Err(e),
            }
        }

        #[cfg(not(target_os = "espidf"))]
        info!("EepromAdapter: simulation backend");

        Ok(adapter)
    }

    /// Open the NVS namespace, run `f` with the handle, close it again.
    #[cfg(target_os = "espidf")]
    fn with_nvs_handle<F, T>(write: bool, f: F) -> Result<T, i32>
    where
        F: FnOnce(nvs_handle_t) -> Result<T, i32>,
    {
        let mut handle: nvs_handle_t = 0;
        let mode = if write {
            nvs_open_mode_t_NVS_READWRITE
        } else {
            nvs_open_mode_t_NVS_READONLY
        };

        let ret = unsafe { nvs_open(NVS_NAMESPACE.as_ptr() as *const _, mode, &mut handle) };
        if ret != ESP_OK {
            return Err(ret);
        }

        let result = f(handle);
        unsafe {
            nvs_close(handle);
        }
        result
    }

    /// Fill the cache from the stored blob.  `Ok(false)` means no blob yet.
    #[cfg(target_os = "espidf")]
    fn load_blob(&mut self) -> Result<bool, StorageError> {
        let result = Self::with_nvs_handle(false, |handle| {
            let mut size = EEPROM_LEN;
            let ret = unsafe {
                nvs_get_blob(
                    handle,
                    NVS_KEY.as_ptr() as *const _,
                    self.cache.as_mut_ptr() as *mut _,
                    &mut size,
                )
            };
            if ret != ESP_OK {
                return Err(ret);
            }
            Ok(())
        });

        match result {
            Ok(()) => Ok(true),
            Err(e) if e == ESP_ERR_NVS_NOT_FOUND => Ok(false),
            Err(e) => {
                warn!("EepromAdapter: NVS read error {e}");
                Err(StorageError::IoError)
            }
        }
    }

    /// Write the whole cached region through to the blob and commit.
    #[cfg(target_os = "espidf")]
    fn store_blob(&self) -> Result<(), StorageError> {
        let result = Self::with_nvs_handle(true, |handle| {
            let ret = unsafe {
                nvs_set_blob(
                    handle,
                    NVS_KEY.as_ptr() as *const _,
                    self.cache.as_ptr() as *const _,
                    EEPROM_LEN,
                )
            };
            if ret != ESP_OK {
                return Err(ret);
            }
            let ret = unsafe { nvs_commit(handle) };
            if ret != ESP_OK {
                return Err(ret);
            }
            Ok(())
        });

        result.map_err(|e| {
            warn!("EepromAdapter: NVS write error {e}");
            StorageError::IoError
        })
    }
}

impl EepromPort for EepromAdapter {
    fn read(&self, offset: usize, buf: &mut [u8]) -> Result<(), StorageError> {
        let end = offset
            .checked_add(buf.len())
            .ok_or(StorageError::OutOfBounds)?;
        let src = self
            .cache
            .get(offset..end)
            .ok_or(StorageError::OutOfBounds)?;
        buf.copy_from_slice(src);
        Ok(())
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), StorageError> {
        let end = offset
            .checked_add(data.len())
            .ok_or(StorageError::OutOfBounds)?;
        let dst = self
            .cache
            .get_mut(offset..end)
            .ok_or(StorageError::OutOfBounds)?;
        dst.copy_from_slice(data);

        #[cfg(target_os = "espidf")]
        self.store_blob()?;

        Ok(())
    }
}

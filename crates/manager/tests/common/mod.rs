//! Shared fixtures for the manager integration tests.
#![allow(dead_code)]

use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use toolchest_core::{Config, Platform};
use toolchest_manager::{Manager, ManagerOptions};

pub const TEST_OS: &str = "testos";
pub const TEST_ARCH: &str = "testarch";

/// Stub client binary: prints `good:<first arg>`, so the default sanity
/// check (`args: ["test"]`, `output: ["good:test"]`) passes against it.
pub const STUB_SCRIPT: &str = "#!/bin/sh\necho \"good:$1\"\n";

pub fn test_platform() -> Platform {
    Platform::new(TEST_OS, TEST_ARCH)
}

/// The composite platform key matching [`test_platform`].
pub fn matching_key() -> String {
    format!("{TEST_OS}-{TEST_ARCH}")
}

pub fn config_value(value: Value) -> Config {
    serde_json::from_value(value).expect("valid test config")
}

/// A catalog with one client named `id`, its platform section under
/// `platform_key`, and the default sanity check.
pub fn single_client_config(id: &str, platform_key: &str, platform_config: Value) -> Config {
    config_value(json!({ "clients": { id: client_spec(platform_key, platform_config) } }))
}

/// The standard test client spec with the default sanity check.
pub fn client_spec(platform_key: &str, platform_config: Value) -> Value {
    client_spec_with_output(platform_key, platform_config, json!(["good:test"]))
}

/// The standard test client spec with custom expected output patterns.
pub fn client_spec_with_output(platform_key: &str, platform_config: Value, output: Value) -> Value {
    json!({
        "homepage": "http://badgerbadgerbadger.com",
        "version": "1.0.0",
        "foo": "bar",
        "versionNotes": "http://badgerbadgerbadger.com",
        "cli": {
            "commands": {
                "sanityCheck": { "args": ["test"], "output": output }
            },
            "platforms": { platform_key: platform_config }
        }
    })
}

pub fn test_manager(config: Config) -> Manager {
    Manager::with_options(config, ManagerOptions::new().with_platform(test_platform()))
}

pub fn test_manager_with_downloads(config: Config, downloads_dir: &Path) -> Manager {
    Manager::with_options(
        config,
        ManagerOptions::new()
            .with_platform(test_platform())
            .with_downloads_dir(downloads_dir.to_path_buf()),
    )
}

/// Write an executable stub that prints `good:<first arg>`.
pub fn write_stub_binary(dir: &Path, name: &str) -> PathBuf {
    write_stub_script(dir, name, STUB_SCRIPT)
}

pub fn write_stub_script(dir: &Path, name: &str, script: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, script).expect("write stub binary");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .expect("make stub executable");
    }
    path
}

/// An in-memory zip archive holding one executable stub binary.
pub fn zip_archive_with_stub(bin_name: &str) -> Vec<u8> {
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut writer = zip::ZipWriter::new(&mut cursor);
        let options = SimpleFileOptions::default().unix_permissions(0o755);
        writer.start_file(bin_name, options).expect("start zip entry");
        writer
            .write_all(STUB_SCRIPT.as_bytes())
            .expect("write zip entry");
        writer.finish().expect("finish zip");
    }
    cursor.into_inner()
}

/// An in-memory tar.gz archive holding one executable stub binary.
pub fn tar_gz_archive_with_stub(bin_name: &str) -> Vec<u8> {
    use flate2::{Compression, write::GzEncoder};

    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);

    let script = STUB_SCRIPT.as_bytes();
    let mut header = tar::Header::new_gnu();
    header.set_path(bin_name).expect("set tar path");
    header.set_size(script.len() as u64);
    header.set_mode(0o755);
    header.set_cksum();
    builder.append(&header, script).expect("append tar entry");

    builder
        .into_inner()
        .expect("finish tar")
        .finish()
        .expect("finish gzip")
}

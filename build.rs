use std::env;
use std::path::PathBuf;

fn main() {
    for variable in ["FFMPEG_DIR", "HDF5_DIR", "VCPKG_ROOT", "VCPKGRS_TRIPLET"] {
        println!("cargo:rerun-if-env-changed={variable}");
    }

    let target_os = env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    if target_os != "windows" {
        return;
    }

    let missing: Vec<&str> = ["FFMPEG_DIR", "HDF5_DIR"]
        .into_iter()
        .filter(|variable| env::var_os(variable).is_none())
        .collect();
    if missing.is_empty() {
        return;
    }

    let Ok(vcpkg_root) = env::var("VCPKG_ROOT") else {
        println!(
            "cargo:warning={} not set. On Windows, install ffmpeg and hdf5 via vcpkg and point FFMPEG_DIR / HDF5_DIR at the install.",
            missing.join(" and "),
        );
        return;
    };

    let triplet = env::var("VCPKGRS_TRIPLET").unwrap_or_else(|_| "x64-windows".to_string());
    let install_dir = PathBuf::from(&vcpkg_root).join("installed").join(&triplet);

    if install_dir.exists() {
        for variable in missing {
            println!(
                "cargo:warning=Detected vcpkg install at {}. Set {variable}={} to make library discovery explicit.",
                install_dir.display(),
                install_dir.display(),
            );
        }
    } else {
        println!(
            "cargo:warning=VCPKG_ROOT is set but nothing is installed at {}.",
            install_dir.display(),
        );
    }
}

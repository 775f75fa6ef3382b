//! Info command implementation

use super::validate::{format_data_info, format_runtime_info, format_training_info};
use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{load_spec, InfoArgs, OutputFormat};
use crate::device::{ComputeDevice, DeviceInfo, SystemDetector};
use crate::error::{Error, Result};

pub fn run_info(args: InfoArgs, level: LogLevel) -> Result<()> {
    let spec = load_spec(&args.config)?;

    match args.format {
        OutputFormat::Text => {
            let device = ComputeDevice::detect(&SystemDetector);
            let info = DeviceInfo::for_device(device);

            log(level, LogLevel::Normal, "Configuration Info:");
            println!();
            println!("{}", format_runtime_info(&spec));
            match spec.runtime.backend_kind() {
                Ok(kind) => println!("  Supported: yes ({kind})"),
                Err(e) => println!("  Supported: no ({e})"),
            }
            println!(
                "  Detected device: {device} - {} ({:.1} GB)",
                info.name, info.memory_gb
            );
            if let Some(driver) = &info.driver_version {
                println!("  Driver: {driver}");
            }
            println!("{}", format_training_info(&spec));
            println!("{}", format_data_info(&spec));
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(&spec).map_err(|e| {
                Error::invalid_config("format", format!("YAML serialization error: {e}"))
            })?;
            println!("{yaml}");
        }
    }

    Ok(())
}

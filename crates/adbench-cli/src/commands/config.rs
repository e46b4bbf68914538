use std::error::Error;

use adbench_agg::serde::to_yaml_string;
use adbench_agg::AggConfig;
use clap::Args;

#[derive(Args, Debug)]
pub struct ConfigArgs {}

pub fn run(_args: &ConfigArgs, config: &AggConfig) -> Result<(), Box<dyn Error>> {
    print!("{}", to_yaml_string(config)?);
    Ok(())
}

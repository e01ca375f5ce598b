//! Context command - describe a location.

use super::common::{Location, LocationArgs};
use crate::error::CliError;
use crate::runner::{print_json, CliRunner};

/// Run the context command.
pub fn run(location: LocationArgs, debug: bool) -> Result<(), CliError> {
    let location = location.resolve()?;

    let runner = CliRunner::with_debug(debug)?;
    runner.log_startup("context");
    let client = runner.create_client()?;
    let context = client.context();

    let result = match location {
        Location::Point { lat, lon } => context.get_context(lat, lon)?,
        Location::Ip(ip) => context.get_context_by_ip(&ip)?,
        Location::Address(address) => context.get_context_by_address(&address)?,
        Location::MyIp => context.get_context_by_my_ip()?,
    };

    print_json(&result)
}

use gasfill_config::{GasConfiguration, GasSetting};
use tracing::debug;

use crate::{
    AutomaticGasPriceProvider, AutomaticGasProvider, FixedGasPriceProvider, FixedGasProvider,
    GanacheGasMultiplierProvider, GasMultiplier, JsonRpcProvider, ProviderResult,
};

pub type BoxedProvider = Box<dyn JsonRpcProvider>;

/// Wraps the transport in the gas providers the configuration asks for.
///
/// From the innermost to the outermost wrapper the chain is:
///
/// 1. [`GanacheGasMultiplierProvider`], if `detect_ganache` is set and `gas` is `auto`.
/// 2. [`AutomaticGasPriceProvider`] or [`FixedGasPriceProvider`].
/// 3. [`AutomaticGasProvider`] or [`FixedGasProvider`].
///
/// Keeping the Ganache wrapper innermost means the gas estimates made by the outer wrappers go
/// through it as well.
///
/// Fails when `gas` is `auto` and the gas multiplier is not a valid [`GasMultiplier`].
pub fn wrap_provider<T>(
    transport: T,
    configuration: &GasConfiguration,
) -> ProviderResult<BoxedProvider>
where
    T: JsonRpcProvider + 'static,
{
    debug!(?configuration, "Building the provider chain");

    let automatic_gas = configuration.gas == GasSetting::Auto;
    let mut provider: BoxedProvider = Box::new(transport);

    if configuration.detect_ganache && automatic_gas {
        provider = Box::new(GanacheGasMultiplierProvider::new(provider));
    }

    provider = match configuration.gas_price {
        GasSetting::Auto => Box::new(AutomaticGasPriceProvider::new(provider)),
        GasSetting::Fixed(gas_price) => Box::new(FixedGasPriceProvider::new(provider, gas_price)),
    };

    let provider: BoxedProvider = match configuration.gas {
        GasSetting::Auto => {
            let multiplier = GasMultiplier::new(configuration.gas_multiplier)?;
            Box::new(AutomaticGasProvider::new(provider, multiplier))
        }
        GasSetting::Fixed(gas_limit) => Box::new(FixedGasProvider::new(provider, gas_limit)),
    };
    Ok(provider)
}

//! vane-openweather — OpenWeather current-conditions client.
//!
//! One HTTP GET per poll cycle against `/data/2.5/weather`, parameterized
//! by ZIP code and API key, parsed into a [`vane_core::WeatherReading`].

pub mod client;

pub use client::{DEFAULT_BASE_URL, OpenWeatherClient};

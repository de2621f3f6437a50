/* Copyright © 2024-2025 Adam Train <adam@trainrelay.net>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 */
use crate::fx::currency::{coerce_code, is_known, search, BASE_CODE};
use crate::fx::money::{parse_amount_string, savings, MAX_FRACTION_DIGITS};
use crate::fx::service::CurrencyService;
use crate::itinerary::days::DurationParser;
use crate::itinerary::plan::Itinerary;
use crate::parsing::filesystem::Filesystem;
use crate::reports::currency_reporter::CurrencyReporter;
use crate::reports::itinerary_reporter::{ItineraryReporter, PriceLines};
use crate::reports::rate_reporter::RateReporter;
use anyhow::{bail, Error};
use clap::{Parser, ValueEnum};
use env_logger::Builder;
use log::{info, warn, LevelFilter};
use std::cmp::PartialEq;

mod config;
mod fx;
mod itinerary;
mod parsing;
mod reports;

#[derive(Parser)]
#[command(
	name = "tripfx",
	version = "1.0",
	about = "Travel package prices in your currency"
)]
struct Cli {
	// ----------------
	// -- POSITIONAL --
	// ----------------
	/// The command to execute
	command: Directive,

	/// Search term, currency code, price or duration, depending on command
	#[arg(required = false)]
	term: Option<String>,

	// -----------
	// -- FLAGS --
	// -----------
	/// Specifies the package file for the itinerary command
	#[arg(short, long)]
	file: Option<String>,

	/// Custom config file location (default: ~/.config/tripfx/config.toml)
	#[arg(long)]
	config: Option<String>,

	/// Show prices in this currency for this run only
	#[arg(short, long)]
	currency: Option<String>,

	/// Maximum amount of decimal places to show for any amounts
	#[arg(short, long)]
	precision: Option<u32>,

	/// Previous price, used to print the savings of a conversion
	#[arg(long)]
	was: Option<String>,

	/// Number of highlights, used when a duration has no day count
	#[arg(long)]
	highlights: Option<usize>,

	/// Skip rate sources entirely; amounts stay in the base currency
	#[arg(long)]
	offline: bool,
}

impl Cli {
	/// Anything finer is float noise
	const MAX_PRECISION: u32 = MAX_FRACTION_DIGITS;

	/// Extra validations on top of what clap does
	fn validate(&self) -> Result<(), Error> {
		if let Some(prec) = self.precision {
			if prec > Cli::MAX_PRECISION {
				bail!("Maximum precision is {}", Cli::MAX_PRECISION);
			}
		}

		if let Some(code) = &self.currency {
			if !is_known(code) {
				warn!("unknown currency {}, showing base currency", code);
			}
		}

		Ok(())
	}

	fn term(&self, what: &str) -> Result<&str, Error> {
		match &self.term {
			Some(term) => Ok(term.as_str()),
			None => bail!("No {} specified", what),
		}
	}

	/// Only commands that can fetch rates need source keys resolved.
	fn uses_network(&self) -> bool {
		!self.offline
			&& matches!(
				self.command,
				Directive::Rates | Directive::Convert | Directive::Itinerary
			)
	}
}

#[derive(ValueEnum, Clone, PartialEq)]
enum Directive {
	List,   // search the currency catalog
	Select, // show or persist the display currency

	Rates, // current rate table

	Convert,   // convert a base-currency price
	Days,      // day count for a duration
	Itinerary, // day-by-day plan for a package file
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Error> {
	let args = Cli::parse();

	let mut builder = Builder::new();
	builder.filter_level(LevelFilter::Warn);
	builder.parse_default_env();
	builder.init();

	args.validate()?;

	// needs neither config nor rates
	if args.command == Directive::Days {
		let parser = DurationParser::new();
		let days =
			parser.day_count(args.term("duration")?, args.highlights.unwrap_or(0));
		println!("{}", days);
		return Ok(());
	}

	let fs = Filesystem::new();
	let config = fs.get_config(args.config.as_ref(), args.uses_network())?;
	let service = CurrencyService::from_config(&config, args.offline)?;

	// the override is never persisted
	let display = match &args.currency {
		Some(code) => coerce_code(code),
		None => service.currency(),
	};
	let (svc, cli) = (&service, &args);
	let show = move |amount: f64| format_price(svc, cli, amount);

	match args.command {
		Directive::List => {
			let query = args.term.as_deref().unwrap_or("");
			CurrencyReporter::new(search(query), display).print();
		},
		Directive::Select => match &args.term {
			Some(code) => {
				if !is_known(code) {
					warn!("unknown currency {}, selecting base currency", code);
				}
				println!("Selected {}", service.set_currency(code));
			},
			None => println!("{}", display),
		},
		Directive::Rates => {
			let snapshot = service.rates().await;
			RateReporter::new(&snapshot).print_all_rates();
		},
		Directive::Convert => {
			let price = args.term("price")?;
			match parse_amount_string(price) {
				None => println!("Price on request"),
				Some(amount) => {
					println!("{}", show(amount).await);

					if let Some(saved) = savings(price, args.was.as_deref()) {
						let was =
							parse_amount_string(args.was.as_deref().unwrap_or(""))
								.unwrap_or_default();
						println!(
							"Was {}, save {}",
							show(was).await,
							show(saved).await
						);
					}
					report_rate_status(&service);
				},
			}
		},
		Directive::Itinerary => {
			let Some(file) = &args.file else {
				bail!("No package file specified");
			};
			let package_file = fs.load_package(file)?;
			let package = &package_file.package;
			let plan = Itinerary::create(
				&DurationParser::new(),
				&package_file.destination,
				package,
			);

			let mut prices = PriceLines {
				price: None,
				was: None,
				savings: None,
			};
			if let Some(amount) =
				package.price.as_deref().and_then(parse_amount_string)
			{
				prices.price = Some(show(amount).await);
			}
			if let Some(saved) = package
				.price
				.as_deref()
				.and_then(|p| savings(p, package.old_price.as_deref()))
			{
				let was = package
					.old_price
					.as_deref()
					.and_then(parse_amount_string)
					.unwrap_or_default();
				prices.was = Some(show(was).await);
				prices.savings = Some(show(saved).await);
			}

			let converted = prices.price.is_some();
			ItineraryReporter::new(&package_file, &plan, prices).print();
			if converted {
				report_rate_status(&service);
			}
		},
		Directive::Days => {}, // handled above
	}

	service.shutdown();
	Ok(())
}

/// Formats a base-currency amount in the one-run override if given, else in
/// the saved selection.
async fn format_price(service: &CurrencyService, args: &Cli, amount: f64) -> String {
	match &args.currency {
		Some(code) => service.format_to(amount, code, args.precision).await,
		None => service.format_from_base(amount, args.precision).await,
	}
}

/// Notes on stderr when printed prices were not converted with live rates.
/// Only meaningful after a conversion has read the rates.
fn report_rate_status(service: &CurrencyService) {
	if service.is_loading() {
		return;
	}

	match service.last_updated() {
		Some(date) => info!("prices converted with rates as of {}", date),
		None => warn!("no exchange rates available; prices shown in {}", BASE_CODE),
	}
}

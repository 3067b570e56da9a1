use crate::commands::print_json;
use crate::error::invalid_input;
use anyhow::Result;
use clap::Args;
use msisdn_config::AppConfig;
use msisdn_core::{normalize, HELP_TEXT};
use serde::Serialize;

#[derive(Debug, Args)]
pub struct CheckArgs {
    #[arg(required = true, value_name = "NUMBER", help = HELP_TEXT)]
    pub numbers: Vec<String>,
}

#[derive(Debug, Serialize)]
struct CheckResultDto {
    input: String,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    msisdn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub fn check(config: &AppConfig, json: bool, args: CheckArgs) -> Result<()> {
    let mut failures = 0usize;
    let mut results = Vec::with_capacity(args.numbers.len());

    for input in &args.numbers {
        match normalize(Some(input.as_str()), &config.normalizer) {
            Ok(Some(msisdn)) => results.push(CheckResultDto {
                input: input.clone(),
                ok: true,
                msisdn: Some(msisdn.into_string()),
                error: None,
            }),
            Ok(None) => {
                failures += 1;
                results.push(CheckResultDto {
                    input: input.clone(),
                    ok: false,
                    msisdn: None,
                    error: Some("a mobile number is required".to_string()),
                });
            }
            Err(err) => {
                failures += 1;
                results.push(CheckResultDto {
                    input: input.clone(),
                    ok: false,
                    msisdn: None,
                    error: Some(config.messages.render(&err)),
                });
            }
        }
    }

    if json {
        print_json(&results)?;
    } else {
        for result in &results {
            match (&result.msisdn, &result.error) {
                (Some(msisdn), _) => println!("{} -> {}", result.input, msisdn),
                (None, Some(error)) => println!("{}: {}", result.input, error),
                (None, None) => {}
            }
        }
    }

    if failures > 0 {
        return Err(invalid_input(format!(
            "{} of {} numbers failed validation",
            failures,
            results.len()
        )));
    }
    Ok(())
}

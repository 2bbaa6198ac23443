use color_eyre::eyre::eyre;
use color_eyre::Result;
use dialoguer::{Confirm, Input, Password};

/// Prompt for a string value with optional default
pub fn prompt_string(prompt: &str, default: Option<&str>) -> Result<String> {
    let mut input = Input::<String>::new().with_prompt(prompt).allow_empty(true);
    if let Some(default_value) = default {
        input = input.default(default_value.to_string());
    }
    input.interact().map_err(|e| eyre!("Failed to read input: {}", e))
}

/// Masked input; an empty answer keeps the current value
pub fn prompt_secret(prompt: &str) -> Result<String> {
    Password::new()
        .with_prompt(prompt)
        .allow_empty_password(true)
        .interact()
        .map_err(|e| eyre!("Failed to read secret: {}", e))
}

pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(|e| eyre!("Failed to read confirmation: {}", e))
}

/// Prompt until the answer parses as a number within `range`
pub fn prompt_number_in<T>(prompt: &str, default: T, range: std::ops::RangeInclusive<T>) -> Result<T>
where
    T: std::str::FromStr + PartialOrd + Copy + std::fmt::Display,
{
    loop {
        let answer = Input::<String>::new()
            .with_prompt(prompt)
            .default(default.to_string())
            .interact()
            .map_err(|e| eyre!("Failed to read input: {}", e))?;

        match parse_in_range(&answer, &range) {
            Some(value) => return Ok(value),
            None => eprintln!(
                "Invalid input. Please enter a number between {} and {}.",
                range.start(),
                range.end()
            ),
        }
    }
}

fn parse_in_range<T>(answer: &str, range: &std::ops::RangeInclusive<T>) -> Option<T>
where
    T: std::str::FromStr + PartialOrd,
{
    answer.trim().parse::<T>().ok().filter(|value| range.contains(value))
}

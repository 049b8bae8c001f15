//! Profile and trading location.

use kasuwa_client::models::ProfileUpdate;
use kasuwa_client::wizard::{LocationFlow, Wizard};
use kasuwa_core::PhoneNumber;

use super::Context;
use crate::error::CliError;

pub async fn show(ctx: &Context) -> Result<(), CliError> {
    let profile = ctx.profile().get().await?;
    println!("{} <{}>", profile.display_name(), profile.email);
    if let Some(phone) = &profile.phone {
        println!("Phone:        {phone}");
    }
    println!("Role:         {:?}", profile.role);
    println!("Verification: {:?}", profile.verification);
    if let Some(location) = &profile.location {
        println!("Location:     {}, {}, {}", location.area, location.lga, location.state);
    }
    Ok(())
}

pub async fn update(
    ctx: &Context,
    first_name: Option<String>,
    last_name: Option<String>,
    phone: Option<String>,
) -> Result<(), CliError> {
    let update = ProfileUpdate {
        first_name,
        last_name,
        phone: phone.as_deref().map(PhoneNumber::parse).transpose()?,
    };
    if update.is_empty() {
        return Err(CliError::InvalidArgument(
            "pass at least one of --first-name, --last-name, --phone".to_string(),
        ));
    }
    let profile = ctx.profile().update(&update).await?;
    println!("Updated {}", profile.display_name());
    Ok(())
}

/// Walk the state → LGA → area flow with the given answers.
pub async fn location(ctx: &Context, state: &str, lga: &str, area: &str) -> Result<(), CliError> {
    let tree = ctx.catalog().locations().await?;
    let mut wizard = Wizard::new(LocationFlow::new(tree));

    wizard.choose(state)?;
    wizard.advance()?;
    wizard.choose(lga)?;
    wizard.advance()?;
    wizard.choose(area)?;
    wizard.submit(ctx.client()).await?;

    println!("Location set to {area}, {lga}, {state}");
    Ok(())
}

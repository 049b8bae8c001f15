//! Sign in, sign up, passcodes, password reset and account deletion.

use kasuwa_client::models::{Credentials, OtpDestination, OtpVerification, Signup};
use kasuwa_client::wizard::{Completion, Destination, PasswordResetFlow, Wizard};
use kasuwa_core::{Email, OtpCode, PhoneNumber, UserRole};
use secrecy::SecretString;

use super::Context;
use crate::error::CliError;

/// Sign in and save the session.
pub async fn login(ctx: &Context, email: &str, password: String) -> Result<(), CliError> {
    let credentials = Credentials {
        email: Email::parse(email)?,
        password: SecretString::from(password),
    };
    let profile = ctx.auth().login(&credentials).await?;
    match profile {
        Some(profile) => println!("Signed in as {}", profile.display_name()),
        None => println!("Signed in as {}", credentials.email),
    }
    Ok(())
}

/// Create an account and save the session.
pub async fn signup(
    ctx: &Context,
    first_name: String,
    last_name: String,
    email: &str,
    phone: &str,
    role: UserRole,
    password: String,
) -> Result<(), CliError> {
    if password.chars().count() < kasuwa_client::wizard::MIN_PASSWORD_CHARS {
        return Err(CliError::InvalidArgument(format!(
            "password must be at least {} characters",
            kasuwa_client::wizard::MIN_PASSWORD_CHARS
        )));
    }
    let signup = Signup {
        first_name,
        last_name,
        email: Email::parse(email)?,
        phone: PhoneNumber::parse(phone)?,
        role,
        password: SecretString::from(password),
    };
    ctx.auth().signup(&signup).await?;
    println!("Account created for {}. Check your email for a verification code.", signup.email);
    Ok(())
}

/// Sign out. The local session is forgotten even if the server call fails.
pub async fn logout(ctx: &Context) -> Result<(), CliError> {
    ctx.auth().logout().await?;
    println!("Signed out");
    Ok(())
}

fn destination(raw: &str) -> Result<OtpDestination, CliError> {
    if raw.contains('@') {
        Ok(OtpDestination::Email(Email::parse(raw)?))
    } else {
        Ok(OtpDestination::Sms(PhoneNumber::parse(raw)?))
    }
}

/// Send a one-time passcode.
pub async fn send_otp(ctx: &Context, raw: &str) -> Result<(), CliError> {
    let destination = destination(raw)?;
    ctx.auth().send_otp(&destination).await?;
    println!("Code sent");
    Ok(())
}

/// Verify a one-time passcode.
pub async fn verify_otp(ctx: &Context, raw: &str, code: &str) -> Result<(), CliError> {
    let verification = OtpVerification {
        destination: destination(raw)?,
        code: OtpCode::parse(code)?,
    };
    ctx.auth().verify_otp(&verification).await?;
    println!("Verified");
    Ok(())
}

/// Email a password reset code.
pub async fn request_password_reset(ctx: &Context, email: &str) -> Result<(), CliError> {
    let email = Email::parse(email)?;
    ctx.auth().request_password_reset(&email).await?;
    println!("If {email} has an account, a reset code is on its way");
    Ok(())
}

/// Set a new password through the two-step reset flow.
pub async fn confirm_password_reset(
    ctx: &Context,
    email: String,
    code: String,
    password: String,
) -> Result<(), CliError> {
    let mut wizard = Wizard::new(PasswordResetFlow);
    wizard.update(|draft| draft.email = email);
    wizard.advance()?;
    wizard.update(|draft| {
        draft.code = code;
        draft.confirm_password.clone_from(&password);
        draft.password = password;
    });

    match wizard.submit(ctx.client()).await? {
        Completion::Redirect(Destination::Login) => {
            println!("Password changed. Sign in with `kasuwa login`.");
        }
        other => tracing::debug!(completion = ?other, "password reset completed"),
    }
    Ok(())
}

/// Delete the signed-in account.
pub async fn delete_account(ctx: &Context, confirmed: bool) -> Result<(), CliError> {
    if !confirmed {
        return Err(CliError::InvalidArgument(
            "account deletion is permanent; pass --yes to confirm".to_string(),
        ));
    }
    ctx.auth().delete_account().await?;
    println!("Account deleted");
    Ok(())
}

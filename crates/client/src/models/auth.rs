//! Login, signup and verification payloads.

use kasuwa_core::{Email, OtpCode, PhoneNumber, UserRole};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};

use super::profile::Profile;

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: Email,
    #[serde(serialize_with = "expose")]
    pub password: SecretString,
}

/// Body of `POST /auth/signup`.
#[derive(Debug, Clone, Serialize)]
pub struct Signup {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub phone: PhoneNumber,
    pub role: UserRole,
    #[serde(serialize_with = "expose")]
    pub password: SecretString,
}

/// Response of login and signup.
#[derive(Deserialize)]
pub struct AuthResponse {
    pub token: String,
    #[serde(default)]
    pub user: Option<Profile>,
}

impl std::fmt::Debug for AuthResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthResponse")
            .field("token", &"[REDACTED]")
            .field("user", &self.user)
            .finish()
    }
}

/// Where a one-time passcode is delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "channel", content = "destination")]
pub enum OtpDestination {
    Email(Email),
    Sms(PhoneNumber),
}

/// Body of `POST /auth/otp/verify`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OtpVerification {
    #[serde(flatten)]
    pub destination: OtpDestination,
    pub code: OtpCode,
}

/// Body of `POST /auth/password/reset`.
#[derive(Debug, Clone, Serialize)]
pub struct PasswordReset {
    pub email: Email,
    pub code: OtpCode,
    #[serde(serialize_with = "expose")]
    pub password: SecretString,
}

fn expose<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_otp_verification_wire_format() {
        let body = OtpVerification {
            destination: OtpDestination::Sms(PhoneNumber::parse("08031234567").unwrap()),
            code: OtpCode::parse("123456").unwrap(),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({
                "channel": "sms",
                "destination": "+2348031234567",
                "code": "123456"
            })
        );
    }

    #[test]
    fn test_credentials_serialize_password_but_debug_hides_it() {
        let creds = Credentials {
            email: Email::parse("ada@kasuwa.ng").unwrap(),
            password: SecretString::from("hunter22"),
        };
        let json = serde_json::to_value(&creds).unwrap();
        assert_eq!(json["password"], "hunter22");
        assert!(!format!("{creds:?}").contains("hunter22"));
    }
}

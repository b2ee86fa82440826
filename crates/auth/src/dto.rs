use serde::Deserialize;
use serde::Serialize;

#[derive(Deserialize)]
pub struct SignUpRequest {
    pub uid: String,
    pub email: String,
    pub name: String,
}

#[derive(Deserialize)]
pub struct SignInRequest {
    pub email: String,
    #[serde(rename = "idToken")]
    pub id_token: String,
}

/// Uniform `{success, message}` body for the sign-up and sign-in forms.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Reply {
    pub success: bool,
    pub message: String,
}

impl Reply {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

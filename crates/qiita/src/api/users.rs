//! `GET /api/v2/users/:user_id`

use bon::Builder;
use qiita_common::error::DecodeError;
use qiita_common::request::{ApiRequest, Response};
use serde::{Deserialize, Serialize};

/// Fetch a single user's public profile.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[builder(start_fn = new)]
pub struct GetUser {
    /// Login name, substituted as one path segment
    #[builder(into)]
    pub username: String,
}

impl ApiRequest for GetUser {
    const NAME: &'static str = "users.get";
    type Output = Profile;

    fn path_segments(&self) -> Vec<&str> {
        vec!["users", self.username.as_str()]
    }
}

/// Undecoded body of a `GetUser` call.
pub type RawBody = Response<GetUser>;

/// A user profile as returned by the API.
///
/// Counters and `team_only` are required: a payload missing any of them (or
/// carrying the wrong type) does not decode at all. Every other field is
/// `None` when absent or `null`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct Profile {
    /// Self-introduction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Facebook account id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook_id: Option<String>,
    /// Number of users this user follows
    pub followees_count: u64,
    /// Number of users following this user
    pub followers_count: u64,
    /// GitHub login
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_login_name: Option<String>,
    /// Login name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Number of public articles
    pub items_count: u64,
    /// LinkedIn account id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin_id: Option<String>,
    /// Free-form location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Free-form organization name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    /// Numeric id that survives login name changes
    pub permanent_id: u64,
    /// Avatar image URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
    /// Whether the user only exists inside a Qiita Team
    pub team_only: bool,
    /// Twitter handle, without the `@`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter_screen_name: Option<String>,
    /// Personal site
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
}

impl Profile {
    /// Labelled rows for a two-line list view, in a fixed order.
    ///
    /// Absent optional fields are left out; counters and `team_only` are
    /// always present.
    pub fn display_rows(&self) -> Vec<(&'static str, String)> {
        let optional = [
            ("id", &self.id),
            ("name", &self.name),
            ("description", &self.description),
            ("location", &self.location),
            ("organization", &self.organization),
            ("website_url", &self.website_url),
            ("profile_image_url", &self.profile_image_url),
            ("github_login_name", &self.github_login_name),
            ("twitter_screen_name", &self.twitter_screen_name),
            ("facebook_id", &self.facebook_id),
            ("linkedin_id", &self.linkedin_id),
        ];

        let mut rows: Vec<(&'static str, String)> = optional
            .into_iter()
            .filter_map(|(label, value)| value.as_ref().map(|v| (label, v.clone())))
            .collect();

        rows.extend([
            ("followees_count", self.followees_count.to_string()),
            ("followers_count", self.followers_count.to_string()),
            ("items_count", self.items_count.to_string()),
            ("permanent_id", self.permanent_id.to_string()),
            ("team_only", self.team_only.to_string()),
        ]);
        rows
    }
}

/// Decode a raw response body into a [`Profile`].
///
/// Fails on anything that is not a JSON object with every required field;
/// there is no partial result.
pub fn decode(raw: &str) -> Result<Profile, DecodeError> {
    Ok(serde_json::from_str(raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full() -> serde_json::Value {
        json!({
            "description": "Rust と Kotlin を書いています",
            "facebook_id": "yuri.fb",
            "followees_count": 12,
            "followers_count": 345,
            "github_login_name": "yuritani",
            "id": "Yuritani",
            "items_count": 7,
            "linkedin_id": "yuri-li",
            "location": "Tokyo, Japan",
            "name": "Yuri Tani",
            "organization": "Example Inc.",
            "permanent_id": 123456,
            "profile_image_url": "https://example.com/a.png",
            "team_only": false,
            "twitter_screen_name": "yuritani_tw",
            "website_url": "https://example.com"
        })
    }

    #[test]
    fn decodes_every_field() {
        let profile = decode(&full().to_string()).unwrap();
        assert_eq!(
            profile,
            Profile {
                description: Some("Rust と Kotlin を書いています".into()),
                facebook_id: Some("yuri.fb".into()),
                followees_count: 12,
                followers_count: 345,
                github_login_name: Some("yuritani".into()),
                id: Some("Yuritani".into()),
                items_count: 7,
                linkedin_id: Some("yuri-li".into()),
                location: Some("Tokyo, Japan".into()),
                name: Some("Yuri Tani".into()),
                organization: Some("Example Inc.".into()),
                permanent_id: 123456,
                profile_image_url: Some("https://example.com/a.png".into()),
                team_only: false,
                twitter_screen_name: Some("yuritani_tw".into()),
                website_url: Some("https://example.com".into()),
            }
        );
    }

    #[test]
    fn missing_or_null_optionals_are_none_not_empty() {
        let profile = decode(
            r#"{"followees_count":0,"followers_count":0,"items_count":0,
                "permanent_id":1,"team_only":true,"name":null,"location":""}"#,
        )
        .unwrap();
        assert_eq!(profile.name, None);
        assert_eq!(profile.description, None);
        assert_eq!(profile.location.as_deref(), Some(""));
        assert!(profile.team_only);
    }

    #[test]
    fn each_required_field_is_required() {
        for field in [
            "followees_count",
            "followers_count",
            "items_count",
            "permanent_id",
            "team_only",
        ] {
            let mut body = full();
            body.as_object_mut().unwrap().remove(field);
            let err = decode(&body.to_string()).unwrap_err();
            assert!(
                err.to_string().contains(field),
                "{field} missing should be named in: {err}"
            );
        }
    }

    #[test]
    fn mistyped_required_fields_fail() {
        for (field, value) in [
            ("followers_count", json!("2")),
            ("items_count", json!(-1)),
            ("permanent_id", json!(1.5)),
            ("team_only", json!("false")),
            ("followees_count", json!(null)),
        ] {
            let mut body = full();
            body[field] = value;
            assert!(matches!(
                decode(&body.to_string()),
                Err(DecodeError::Json(_))
            ));
        }
    }

    #[test]
    fn non_json_fails() {
        for raw in ["", "no data", "<html>502</html>", "[1,2,3]", "{\"followees_count\":"] {
            assert!(decode(raw).is_err(), "{raw:?} should not decode");
        }
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let mut body = full();
        body["qiita_team_name"] = json!("dev");
        body["private"] = json!(false);
        assert!(decode(&body.to_string()).is_ok());
    }

    #[test]
    fn display_rows_skip_absent_fields() {
        let profile = decode(
            r#"{"description":"hi","followees_count":1,"followers_count":2,
                "items_count":3,"permanent_id":42,"team_only":false}"#,
        )
        .unwrap();
        assert_eq!(
            profile.display_rows(),
            vec![
                ("description", "hi".to_string()),
                ("followees_count", "1".to_string()),
                ("followers_count", "2".to_string()),
                ("items_count", "3".to_string()),
                ("permanent_id", "42".to_string()),
                ("team_only", "false".to_string()),
            ]
        );
    }

    #[test]
    fn get_user_path() {
        let req = GetUser::new().username("Yuritani").build();
        assert_eq!(req.path_segments(), vec!["users", "Yuritani"]);
    }
}

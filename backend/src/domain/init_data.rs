//! Telegram Web App init data signature checks.
//!
//! The mini app forwards the `initData` query string it receives from
//! Telegram. Every field except `hash` is signed: the fields are sorted by
//! key, rendered as `key=value` lines, and authenticated with HMAC-SHA-256
//! under a key derived from the bot token.
//!
//! ```
//! use tracker::domain::init_data::{sign_init_data, verify_init_data};
//!
//! let fields = [("auth_date", "1760000000"), ("user", r#"{"id":42}"#)];
//! let payload = sign_init_data(&fields, "123:token").expect("signable");
//! assert!(verify_init_data(&payload, "123:token"));
//! assert!(!verify_init_data(&payload, "123:other"));
//! ```

use std::collections::BTreeMap;

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use url::form_urlencoded;

type HmacSha256 = Hmac<Sha256>;

/// Key used to derive the per-bot secret.
const SECRET_KEY_SEED: &[u8] = b"WebAppData";

/// Name of the signature field.
pub const HASH_FIELD: &str = "hash";

/// Errors raised while signing init data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InitDataError {
    #[error("HMAC key was rejected")]
    InvalidKey,
}

/// Identity claimed by the `user` field.
///
/// The claim is only trustworthy once [`verify_init_data`] has succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TelegramUser {
    pub id: i64,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub language_code: Option<String>,
    #[serde(default)]
    pub is_premium: Option<bool>,
    #[serde(default)]
    pub photo_url: Option<String>,
}

/// Decode the query string into sorted fields.
///
/// Empty values are skipped and a repeated key keeps its last value.
fn parse_fields(raw: &str) -> BTreeMap<String, String> {
    form_urlencoded::parse(raw.as_bytes())
        .into_owned()
        .filter(|(_, value)| !value.is_empty())
        .collect()
}

/// Render signed fields as the newline-joined `key=value` check string.
pub fn data_check_string<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let sorted: BTreeMap<String, String> = fields
        .into_iter()
        .map(|(key, value)| (key.as_ref().to_owned(), value.as_ref().to_owned()))
        .collect();
    sorted
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn signing_mac(bot_token: &str) -> Result<HmacSha256, InitDataError> {
    let mut derive =
        HmacSha256::new_from_slice(SECRET_KEY_SEED).map_err(|_| InitDataError::InvalidKey)?;
    derive.update(bot_token.as_bytes());
    let secret = derive.finalize().into_bytes();
    HmacSha256::new_from_slice(&secret).map_err(|_| InitDataError::InvalidKey)
}

/// Lowercase hex HMAC of `check_string` for `bot_token`.
pub fn compute_hash(check_string: &str, bot_token: &str) -> Result<String, InitDataError> {
    let mut mac = signing_mac(bot_token)?;
    mac.update(check_string.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Encode `fields` as a query string carrying a valid `hash`.
pub fn sign_init_data<K, V>(fields: &[(K, V)], bot_token: &str) -> Result<String, InitDataError>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let check_string = data_check_string(
        fields
            .iter()
            .map(|(key, value)| (key.as_ref(), value.as_ref())),
    );
    let hash = compute_hash(&check_string, bot_token)?;

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in fields {
        serializer.append_pair(key.as_ref(), value.as_ref());
    }
    serializer.append_pair(HASH_FIELD, &hash);
    Ok(serializer.finish())
}

fn is_lowercase_hex(value: &str) -> bool {
    value
        .bytes()
        .all(|byte| byte.is_ascii_digit() || (b'a'..=b'f').contains(&byte))
}

/// Whether `raw` carries a valid signature for `bot_token`.
///
/// Missing, empty, or non-hex hashes are invalid, and so is a hash in
/// uppercase hex. The digest comparison runs in constant time.
pub fn verify_init_data(raw: &str, bot_token: &str) -> bool {
    let mut fields = parse_fields(raw);
    let Some(supplied) = fields.remove(HASH_FIELD) else {
        return false;
    };
    if !is_lowercase_hex(&supplied) {
        return false;
    }
    let Ok(expected) = hex::decode(supplied.as_bytes()) else {
        return false;
    };
    let Ok(mut mac) = signing_mac(bot_token) else {
        return false;
    };
    mac.update(data_check_string(&fields).as_bytes());
    mac.verify_slice(&expected).is_ok()
}

/// Parse the `user` field, regardless of signature validity.
pub fn telegram_user(raw: &str) -> Option<TelegramUser> {
    let fields = parse_fields(raw);
    let user = fields.get("user")?;
    serde_json::from_str(user).ok()
}

/// Telegram id claimed by the `user` field.
pub fn telegram_user_id(raw: &str) -> Option<i64> {
    telegram_user(raw).map(|user| user.id)
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::{fixture, rstest};

    const BOT_TOKEN: &str = "7012345678:AAH-test-token";

    #[fixture]
    fn fields() -> Vec<(&'static str, &'static str)> {
        vec![
            ("query_id", "AAHdF6IQAAAAAN0XohDhrOrc"),
            (
                "user",
                r#"{"id":279058397,"first_name":"Vlad","username":"vdkfrost","language_code":"ru"}"#,
            ),
            ("auth_date", "1760779200"),
        ]
    }

    #[rstest]
    fn check_string_is_sorted_and_newline_joined() {
        let rendered = data_check_string([("user", "{}"), ("auth_date", "1"), ("query_id", "q")]);
        assert_eq!(rendered, "auth_date=1\nquery_id=q\nuser={}");
    }

    #[rstest]
    fn recomputed_hash_verifies(fields: Vec<(&'static str, &'static str)>) {
        let payload = sign_init_data(&fields, BOT_TOKEN).expect("signable");
        assert!(verify_init_data(&payload, BOT_TOKEN));
    }

    #[rstest]
    fn hash_is_lowercase_hex() {
        let hash = compute_hash("auth_date=1", BOT_TOKEN).expect("hash");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[rstest]
    fn field_order_in_payload_does_not_matter(fields: Vec<(&'static str, &'static str)>) {
        let check_string = data_check_string(fields.iter().copied());
        let hash = compute_hash(&check_string, BOT_TOKEN).expect("hash");
        let mut reversed = form_urlencoded::Serializer::new(String::new());
        reversed.append_pair(HASH_FIELD, &hash);
        for (key, value) in fields.iter().rev() {
            reversed.append_pair(key, value);
        }
        assert!(verify_init_data(&reversed.finish(), BOT_TOKEN));
    }

    #[rstest]
    #[case::tampered_field("auth_date=1760779200", "auth_date=1760779201")]
    #[case::tampered_user("279058397", "279058398")]
    fn mutated_payload_is_rejected(
        fields: Vec<(&'static str, &'static str)>,
        #[case] from: &str,
        #[case] to: &str,
    ) {
        let payload = sign_init_data(&fields, BOT_TOKEN).expect("signable");
        let tampered = payload.replacen(from, to, 1);
        assert_ne!(tampered, payload);
        assert!(!verify_init_data(&tampered, BOT_TOKEN));
    }

    #[rstest]
    fn other_secret_is_rejected(fields: Vec<(&'static str, &'static str)>) {
        let payload = sign_init_data(&fields, BOT_TOKEN).expect("signable");
        assert!(!verify_init_data(&payload, "7012345678:AAH-other-token"));
    }

    #[rstest]
    #[case::missing_hash("auth_date=1760779200&user=%7B%22id%22%3A1%7D")]
    #[case::empty_hash("auth_date=1760779200&hash=")]
    #[case::non_hex_hash("auth_date=1760779200&hash=zz-not-hex")]
    #[case::uppercase_hash("auth_date=1760779200&hash=ABCDEF0123")]
    #[case::empty_payload("")]
    fn malformed_hash_fails_closed(#[case] payload: &str) {
        assert!(!verify_init_data(payload, BOT_TOKEN));
    }

    #[rstest]
    fn uppercase_hash_is_rejected(fields: Vec<(&'static str, &'static str)>) {
        let payload = sign_init_data(&fields, BOT_TOKEN).expect("signable");
        let (signed, hash) = payload
            .rsplit_once("hash=")
            .expect("hash is appended last");
        let shouted = format!("{signed}hash={}", hash.to_ascii_uppercase());
        assert_ne!(shouted, payload);
        assert!(!verify_init_data(&shouted, BOT_TOKEN));
    }

    #[rstest]
    fn user_claim_is_parsed_without_verification(fields: Vec<(&'static str, &'static str)>) {
        let payload = sign_init_data(&fields, BOT_TOKEN).expect("signable");
        let user = telegram_user(&payload).expect("user field");
        assert_eq!(user.id, 279_058_397);
        assert_eq!(user.username.as_deref(), Some("vdkfrost"));
        assert_eq!(telegram_user_id("user=%7B%22id%22%3A5%7D&hash=00"), Some(5));
    }

    #[rstest]
    #[case::absent("auth_date=1")]
    #[case::not_json("user=plain")]
    #[case::missing_id("user=%7B%22username%22%3A%22x%22%7D")]
    fn unusable_user_claim_is_none(#[case] payload: &str) {
        assert_eq!(telegram_user_id(payload), None);
    }
}

//! Account details: `souk profile` and `souk phone`.

use std::io::Write;

use souk_client::ApiClient;
use souk_client::error::set_sentry_user;
use souk_core::{PhoneNumber, Profile, UserId};

use super::CliError;

/// Print the profile of `user_id`.
///
/// # Errors
///
/// Returns an error if the API request or writing the output fails.
pub async fn show(api: &ApiClient, user_id: &UserId, out: &mut impl Write) -> Result<(), CliError> {
    set_sentry_user(user_id);

    let profile = api.profile(user_id).await?;
    write_profile(out, &profile)?;
    Ok(())
}

/// Set the phone number of `user_id` and print the updated profile.
///
/// # Errors
///
/// Returns an error if the backend rejects the update or writing the output
/// fails.
pub async fn set_phone(
    api: &ApiClient,
    user_id: &UserId,
    phone: &PhoneNumber,
    out: &mut impl Write,
) -> Result<(), CliError> {
    set_sentry_user(user_id);

    let profile = api.update_phone(user_id, phone).await?;
    write_profile(out, &profile)?;
    Ok(())
}

fn write_profile(out: &mut impl Write, profile: &Profile) -> std::io::Result<()> {
    let or_dash = |value: Option<&str>| value.unwrap_or("-").to_owned();

    writeln!(out, "Username:  {}", or_dash(profile.username.as_deref()))?;
    writeln!(out, "Email:     {}", or_dash(profile.email.as_deref()))?;
    writeln!(
        out,
        "Phone:     {}",
        or_dash(profile.phone.as_ref().map(PhoneNumber::as_str))
    )
}

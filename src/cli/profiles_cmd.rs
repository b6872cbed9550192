//! Profiles command handler

use crate::infrastructure::{ProfilesClient, ProfilesError};

use super::args::ProfilesAction;
use super::presenter::Presenter;

/// Handle profiles subcommand
pub async fn handle_profiles_command(
    action: ProfilesAction,
    client: &ProfilesClient,
    presenter: &Presenter,
) -> Result<(), ProfilesError> {
    match action {
        ProfilesAction::List => handle_list(client, presenter).await,
        ProfilesAction::Delete { id } => handle_delete(client, presenter, &id).await,
        ProfilesAction::Default => handle_default(client, presenter).await,
    }
}

async fn handle_list(client: &ProfilesClient, presenter: &Presenter) -> Result<(), ProfilesError> {
    let profiles = client.list().await?;

    if profiles.is_empty() {
        presenter.info("No saved profiles");
        return Ok(());
    }

    for profile in profiles {
        presenter.key_value(&profile.id, &profile.name);
    }
    Ok(())
}

async fn handle_delete(
    client: &ProfilesClient,
    presenter: &Presenter,
    id: &str,
) -> Result<(), ProfilesError> {
    client.delete(id).await?;
    presenter.success(&format!("Deleted profile {}", id));
    Ok(())
}

async fn handle_default(
    client: &ProfilesClient,
    presenter: &Presenter,
) -> Result<(), ProfilesError> {
    match client.default_profile().await? {
        Some(profile) => presenter.key_value(&profile.id, &profile.name),
        None => presenter.info("No default profile set"),
    }
    Ok(())
}

use uuid::Uuid;

use super::dto::{TransportMode, UserProfile};
use super::repo::ProfileRepo as _;
use crate::error::Result;
use crate::state::AppState;

/// Stored mode, or the default when no profile row exists yet.
pub async fn transport_mode(st: &AppState, user_id: Uuid) -> Result<TransportMode> {
    let profile = st.profiles.get(user_id).await?;
    Ok(profile.map(|p| p.transport_mode).unwrap_or_default())
}

pub async fn save_transport_mode(
    st: &AppState,
    user_id: Uuid,
    mode: TransportMode,
) -> Result<UserProfile> {
    st.profiles
        .upsert(UserProfile {
            id: user_id,
            transport_mode: mode,
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;

    #[tokio::test]
    async fn defaults_to_car_without_a_profile_row() {
        let st = AppState::fake();
        let mode = transport_mode(&st, Uuid::new_v4()).await.expect("fetch mode");
        assert_eq!(mode, TransportMode::Car);
    }

    #[tokio::test]
    async fn saving_twice_updates_the_same_row() {
        let st = AppState::fake();
        let user_id = Uuid::new_v4();

        save_transport_mode(&st, user_id, TransportMode::Bike)
            .await
            .expect("first save creates");
        assert_eq!(
            transport_mode(&st, user_id).await.expect("fetch"),
            TransportMode::Bike
        );

        save_transport_mode(&st, user_id, TransportMode::Walk)
            .await
            .expect("second save updates");
        assert_eq!(
            transport_mode(&st, user_id).await.expect("fetch"),
            TransportMode::Walk
        );
        assert_eq!(st.profile_row_count(), 1);
    }
}

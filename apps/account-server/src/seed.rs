//! Fixture users registered at startup.

use account_store::{AccountService, AccountStore};
use chrono::{Local, NaiveDate};
use entities::{NewUser, format_date};
use rand::{Rng, distr::Alphanumeric};
use tracing::{info, warn};

/// Email of the fixed test user.
pub const TEST_USER_EMAIL: &str = "test@test.ru";

/// Password of the fixed test user.
pub const TEST_USER_PASSWORD: &str = "testtest";

fn random_word(rng: &mut impl Rng, len: usize) -> String {
    rng.sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect::<String>()
        .to_lowercase()
}

fn random_user(rng: &mut impl Rng, date_of_birth: NaiveDate) -> NewUser {
    let handle = random_word(rng, 8);
    let name = random_word(rng, 6);
    let password = random_word(rng, 12);

    NewUser::new(
        format!("{handle}@example.com"),
        name,
        password,
        format_date(date_of_birth),
    )
    .with_handle(handle)
}

fn random_birth_year(rng: &mut impl Rng) -> i32 {
    rng.random_range(1960..=2005)
}

/// Builds the fixture users for `today`.
///
/// Between 5 and 14 random users, one random user born today and the fixed
/// test user, also born today.
pub fn fixture_users(today: NaiveDate) -> Vec<NewUser> {
    let mut rng = rand::rng();
    let count = rng.random_range(5..15);

    let mut users: Vec<NewUser> = (0..count)
        .map(|_| {
            let year = random_birth_year(&mut rng);
            let day = rng.random_range(1..=365);
            let born = NaiveDate::from_yo_opt(year, day).unwrap_or(today);
            random_user(&mut rng, born)
        })
        .collect();

    users.push(random_user(&mut rng, today));

    users.push(
        NewUser::new(
            TEST_USER_EMAIL,
            "Test User",
            TEST_USER_PASSWORD,
            format_date(today),
        )
        .with_handle("test"),
    );

    users
}

/// Registers the fixture users. Failures are logged and skipped.
pub async fn seed_users<S: AccountStore>(accounts: &AccountService<S>) {
    let users = fixture_users(Local::now().date_naive());
    let total = users.len();
    let mut registered = 0;

    for user in users {
        match accounts.register(user).await {
            Ok(_) => registered += 1,
            Err(e) => warn!(error = %e, "Failed to seed user"),
        }
    }

    info!(count = registered, total, "Seeded fixture users");
}

#[cfg(test)]
mod tests {
    use account_store::MemoryAccountStore;
    use auth::{JwtConfig, JwtManager};

    use super::*;

    fn service() -> AccountService<MemoryAccountStore> {
        AccountService::new(
            MemoryAccountStore::new(),
            JwtManager::new(JwtConfig::new("seed-secret")),
        )
    }

    #[test]
    fn test_fixture_users_shape() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let users = fixture_users(today);

        assert!((7..=16).contains(&users.len()));

        let test_user = users.last().unwrap();
        assert_eq!(test_user.email, TEST_USER_EMAIL);
        assert_eq!(test_user.password, TEST_USER_PASSWORD);
        assert_eq!(test_user.date_of_birth, "2024-06-15");

        let random_today = &users[users.len() - 2];
        assert_eq!(random_today.date_of_birth, "2024-06-15");
    }

    #[tokio::test]
    async fn test_seed_users_registers_test_user() {
        let accounts = service();
        seed_users(&accounts).await;

        let (view, _) = accounts
            .login(TEST_USER_EMAIL, TEST_USER_PASSWORD)
            .await
            .unwrap();
        assert_eq!(view.email, TEST_USER_EMAIL);

        let today = accounts.list_born_today().await.unwrap();
        assert!(today.iter().any(|u| u.email == TEST_USER_EMAIL));
        assert!(today.len() >= 2);
    }
}

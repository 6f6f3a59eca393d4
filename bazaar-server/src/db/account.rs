//! Account Repository

use super::sequence::{self, IdKind};
use super::{RepoError, RepoResult};
use shared::models::{Account, AccountStatus, Role};
use sqlx::SqlitePool;

const ACCOUNT_COLUMNS: &str =
    "id, role, full_name, email, mobile, password_hash, shop_name, address, status, created_at";

/// Insert payload with the password already hashed
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub role: Role,
    pub full_name: String,
    pub email: String,
    pub mobile: Option<String>,
    pub password_hash: String,
    pub shop_name: Option<String>,
    pub address: Option<String>,
    pub status: AccountStatus,
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<Account>> {
    let account = sqlx::query_as::<_, Account>(&format!(
        "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(account)
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> RepoResult<Option<Account>> {
    let account = sqlx::query_as::<_, Account>(&format!(
        "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = ?"
    ))
    .bind(email.trim())
    .fetch_optional(pool)
    .await?;
    Ok(account)
}

/// Create an account, issuing its id from the role's sequence
pub async fn create(pool: &SqlitePool, data: NewAccount) -> RepoResult<Account> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let id = sequence::next_id(&mut *tx, IdKind::from(data.role)).await?;

    let result = sqlx::query(
        "INSERT INTO accounts (id, role, full_name, email, mobile, password_hash, shop_name, address, status, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(data.role)
    .bind(data.full_name.trim())
    .bind(data.email.trim())
    .bind(&data.mobile)
    .bind(&data.password_hash)
    .bind(&data.shop_name)
    .bind(&data.address)
    .bind(data.status)
    .bind(now)
    .execute(&mut *tx)
    .await;

    if let Err(e) = result {
        return Err(match RepoError::from(e) {
            RepoError::Duplicate(_) => {
                RepoError::Duplicate(format!("Email {} is already registered", data.email.trim()))
            }
            other => other,
        });
    }

    tx.commit().await?;

    find_by_id(pool, &id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create account".into()))
}

/// List accounts of one role, optionally filtered by status, newest first
pub async fn find_by_role(
    pool: &SqlitePool,
    role: Role,
    status: Option<AccountStatus>,
) -> RepoResult<Vec<Account>> {
    let accounts = sqlx::query_as::<_, Account>(&format!(
        "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE role = ? AND (? IS NULL OR status = ?) ORDER BY created_at DESC, id DESC"
    ))
    .bind(role)
    .bind(status)
    .bind(status)
    .fetch_all(pool)
    .await?;
    Ok(accounts)
}

/// Set moderation status; admins are never targeted
pub async fn update_status(
    pool: &SqlitePool,
    id: &str,
    status: AccountStatus,
) -> RepoResult<Account> {
    let rows = sqlx::query("UPDATE accounts SET status = ? WHERE id = ? AND role != 'admin'")
        .bind(status)
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();

    if rows == 0 {
        return Err(RepoError::NotFound(format!("Account {id}")));
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Account {id}")))
}

pub async fn count_by_role(pool: &SqlitePool, role: Role) -> RepoResult<i64> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM accounts WHERE role = ?")
        .bind(role)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn count_by_role_and_status(
    pool: &SqlitePool,
    role: Role,
    status: AccountStatus,
) -> RepoResult<i64> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM accounts WHERE role = ? AND status = ?")
        .bind(role)
        .bind(status)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::*;

    fn new_account(role: Role, email: &str) -> NewAccount {
        NewAccount {
            role,
            full_name: "Grace Hopper".into(),
            email: email.into(),
            mobile: None,
            password_hash: "hash".into(),
            shop_name: (role == Role::Shopkeeper).then(|| "Hopper Goods".to_string()),
            address: None,
            status: if role == Role::Shopkeeper {
                AccountStatus::Pending
            } else {
                AccountStatus::Active
            },
        }
    }

    #[tokio::test]
    async fn test_create_issues_role_prefixed_ids() {
        let pool = test_pool().await;
        let c = create(&pool, new_account(Role::Customer, "c@example.com")).await.unwrap();
        let s = create(&pool, new_account(Role::Shopkeeper, "s@example.com")).await.unwrap();
        let a = create(&pool, new_account(Role::Admin, "a@example.com")).await.unwrap();
        assert_eq!(c.id, "C11111");
        assert_eq!(s.id, "S1111");
        assert_eq!(s.status, AccountStatus::Pending);
        assert_eq!(a.id, "A111");
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected_case_insensitively() {
        let pool = test_pool().await;
        create(&pool, new_account(Role::Customer, "ada@example.com")).await.unwrap();
        let err = create(&pool, new_account(Role::Customer, "ADA@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
        // the failed insert gave its id back
        let next = create(&pool, new_account(Role::Customer, "bob@example.com")).await.unwrap();
        assert_eq!(next.id, "C11112");
    }

    #[tokio::test]
    async fn test_update_status_skips_admins() {
        let pool = test_pool().await;
        seed_account(&pool, "A111", Role::Admin, AccountStatus::Active).await;
        seed_account(&pool, "S1111", Role::Shopkeeper, AccountStatus::Pending).await;

        let approved = update_status(&pool, "S1111", AccountStatus::Active).await.unwrap();
        assert_eq!(approved.status, AccountStatus::Active);

        let err = update_status(&pool, "A111", AccountStatus::Blocked).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_find_by_role_filters_status() {
        let pool = test_pool().await;
        seed_account(&pool, "S1111", Role::Shopkeeper, AccountStatus::Pending).await;
        seed_account(&pool, "S1112", Role::Shopkeeper, AccountStatus::Active).await;
        seed_account(&pool, "C11111", Role::Customer, AccountStatus::Active).await;

        let all = find_by_role(&pool, Role::Shopkeeper, None).await.unwrap();
        assert_eq!(all.len(), 2);
        let pending = find_by_role(&pool, Role::Shopkeeper, Some(AccountStatus::Pending))
            .await
            .unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, "S1111");
        assert_eq!(
            count_by_role_and_status(&pool, Role::Shopkeeper, AccountStatus::Pending)
                .await
                .unwrap(),
            1
        );
    }
}

use async_trait::async_trait;
use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::user::models::Address;
use crate::domain::user::models::BankDetails;
use crate::domain::user::models::Contacts;
use crate::domain::user::models::Passport;
use crate::domain::user::models::User;
use crate::domain::user::models::UserChanges;
use crate::domain::user::models::UserCredentials;
use crate::domain::user::models::UserDetails;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

const USER_COLUMNS: &str = "id, user_type, role, name, shortname, tin, ogrn, kpp, brand, \
                            manager_name, manager_position, created_at, updated_at";

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    user_type: String,
    role: String,
    name: String,
    shortname: Option<String>,
    tin: Option<String>,
    ogrn: Option<String>,
    kpp: Option<String>,
    brand: Option<String>,
    manager_name: Option<String>,
    manager_position: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> Result<User, UserError> {
        Ok(User {
            id: UserId(self.id),
            user_type: self.user_type.parse().map_err(UserError::DatabaseError)?,
            role: self.role.parse().map_err(UserError::DatabaseError)?,
            name: self.name,
            shortname: self.shortname,
            tin: self.tin,
            ogrn: self.ogrn,
            kpp: self.kpp,
            brand: self.brand,
            manager_name: self.manager_name,
            manager_position: self.manager_position,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CredentialsRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
}

#[derive(sqlx::FromRow)]
struct PassportRow {
    date_of_birth: NaiveDate,
    series: String,
    number: String,
    issued_by: String,
    issue_date: NaiveDate,
    division_code: String,
}

impl From<PassportRow> for Passport {
    fn from(r: PassportRow) -> Self {
        Passport {
            date_of_birth: r.date_of_birth,
            series: r.series,
            number: r.number,
            issued_by: r.issued_by,
            issue_date: r.issue_date,
            division_code: r.division_code,
        }
    }
}

#[derive(sqlx::FromRow)]
struct AddressRow {
    legal_address: Option<String>,
    registration_address: String,
    actual_address: String,
}

impl From<AddressRow> for Address {
    fn from(r: AddressRow) -> Self {
        Address {
            legal_address: r.legal_address,
            registration_address: r.registration_address,
            actual_address: r.actual_address,
        }
    }
}

#[derive(sqlx::FromRow)]
struct BankDetailsRow {
    bic: String,
    bank_name: String,
    correspondent_account: String,
    current_account: String,
    comment: Option<String>,
}

impl From<BankDetailsRow> for BankDetails {
    fn from(r: BankDetailsRow) -> Self {
        BankDetails {
            bic: r.bic,
            bank_name: r.bank_name,
            correspondent_account: r.correspondent_account,
            current_account: r.current_account,
            comment: r.comment,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ContactsRow {
    personal_phone: String,
    extra_phone: Option<String>,
    public_phone: Option<String>,
    email: String,
    whatsapp: Option<String>,
    telegram: Option<String>,
}

impl From<ContactsRow> for Contacts {
    fn from(r: ContactsRow) -> Self {
        Contacts {
            personal_phone: r.personal_phone,
            extra_phone: r.extra_phone,
            public_phone: r.public_phone,
            email: r.email,
            whatsapp: r.whatsapp,
            telegram: r.telegram,
        }
    }
}

fn database_error(e: sqlx::Error) -> UserError {
    UserError::DatabaseError(e.to_string())
}

fn write_error(e: sqlx::Error, name: &str) -> UserError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() && db_err.constraint() == Some("users_name_key") {
            return UserError::NameAlreadyExists(name.to_string());
        }
    }
    database_error(e)
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: User, password_hash: String) -> Result<User, UserError> {
        let mut tx = self.pool.begin().await.map_err(database_error)?;

        sqlx::query(
            r#"
            INSERT INTO users (
                id, user_type, role, name, shortname, tin, ogrn, kpp, brand,
                manager_name, manager_position, password_hash, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(user.id.0)
        .bind(user.user_type.as_str())
        .bind(user.role.as_str())
        .bind(&user.name)
        .bind(&user.shortname)
        .bind(&user.tin)
        .bind(&user.ogrn)
        .bind(&user.kpp)
        .bind(&user.brand)
        .bind(&user.manager_name)
        .bind(&user.manager_position)
        .bind(&password_hash)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| write_error(e, &user.name))?;

        tx.commit().await.map_err(database_error)?;

        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<User>, UserError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE name = $1",
            USER_COLUMNS
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_credentials_by_name(
        &self,
        name: &str,
    ) -> Result<Option<UserCredentials>, UserError> {
        let row = sqlx::query_as::<_, CredentialsRow>(&format!(
            "SELECT {}, password_hash FROM users WHERE name = $1",
            USER_COLUMNS
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.map(|r| {
            Ok(UserCredentials {
                user: r.user.into_user()?,
                password_hash: r.password_hash,
            })
        })
        .transpose()
    }

    async fn update(
        &self,
        id: &UserId,
        changes: UserChanges,
        password_hash: Option<String>,
    ) -> Result<User, UserError> {
        let mut tx = self.pool.begin().await.map_err(database_error)?;

        // Column-wise so a concurrent update of other columns survives.
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users
            SET role = COALESCE($2, role),
                shortname = COALESCE($3, shortname),
                tin = COALESCE($4, tin),
                ogrn = COALESCE($5, ogrn),
                kpp = COALESCE($6, kpp),
                brand = COALESCE($7, brand),
                manager_name = COALESCE($8, manager_name),
                manager_position = COALESCE($9, manager_position),
                password_hash = COALESCE($10, password_hash),
                updated_at = $11
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(id.0)
        .bind(changes.role.map(|role| role.as_str()))
        .bind(&changes.shortname)
        .bind(&changes.tin)
        .bind(&changes.ogrn)
        .bind(&changes.kpp)
        .bind(&changes.brand)
        .bind(&changes.manager_name)
        .bind(&changes.manager_position)
        .bind(&password_hash)
        .bind(Utc::now())
        .fetch_optional(&mut *tx)
        .await
        .map_err(database_error)?;

        let Some(row) = row else {
            return Err(UserError::NotFound(id.to_string()));
        };

        tx.commit().await.map_err(database_error)?;

        row.into_user()
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserError> {
        let mut tx = self.pool.begin().await.map_err(database_error)?;

        // Sub-records go with the user through ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.0)
            .execute(&mut *tx)
            .await
            .map_err(database_error)?;

        tx.commit().await.map_err(database_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_details(&self, id: &UserId) -> Result<UserDetails, UserError> {
        let mut tx = self.pool.begin().await.map_err(database_error)?;

        let passport = sqlx::query_as::<_, PassportRow>(
            r#"
            SELECT date_of_birth, series, number, issued_by, issue_date, division_code
            FROM passport_details
            WHERE user_id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&mut *tx)
        .await
        .map_err(database_error)?;

        let address = sqlx::query_as::<_, AddressRow>(
            r#"
            SELECT legal_address, registration_address, actual_address
            FROM address
            WHERE user_id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&mut *tx)
        .await
        .map_err(database_error)?;

        let bank_details = sqlx::query_as::<_, BankDetailsRow>(
            r#"
            SELECT bic, bank_name, correspondent_account, current_account, comment
            FROM bank_details
            WHERE user_id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&mut *tx)
        .await
        .map_err(database_error)?;

        let contacts = sqlx::query_as::<_, ContactsRow>(
            r#"
            SELECT personal_phone, extra_phone, public_phone, email, whatsapp, telegram
            FROM contacts
            WHERE user_id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&mut *tx)
        .await
        .map_err(database_error)?;

        tx.commit().await.map_err(database_error)?;

        Ok(UserDetails {
            passport: passport.map(Passport::from),
            address: address.map(Address::from),
            bank_details: bank_details.map(BankDetails::from),
            contacts: contacts.map(Contacts::from),
        })
    }

    async fn upsert_details(&self, id: &UserId, details: &UserDetails) -> Result<(), UserError> {
        let mut tx = self.pool.begin().await.map_err(database_error)?;

        // Locks the owner so a concurrent delete cannot interleave.
        let owner = sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE id = $1 FOR UPDATE")
            .bind(id.0)
            .fetch_optional(&mut *tx)
            .await
            .map_err(database_error)?;

        if owner.is_none() {
            return Err(UserError::NotFound(id.to_string()));
        }

        if let Some(passport) = &details.passport {
            sqlx::query(
                r#"
                INSERT INTO passport_details (
                    user_id, date_of_birth, series, number, issued_by, issue_date, division_code
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                ON CONFLICT (user_id) DO UPDATE SET
                    date_of_birth = EXCLUDED.date_of_birth,
                    series = EXCLUDED.series,
                    number = EXCLUDED.number,
                    issued_by = EXCLUDED.issued_by,
                    issue_date = EXCLUDED.issue_date,
                    division_code = EXCLUDED.division_code
                "#,
            )
            .bind(id.0)
            .bind(passport.date_of_birth)
            .bind(&passport.series)
            .bind(&passport.number)
            .bind(&passport.issued_by)
            .bind(passport.issue_date)
            .bind(&passport.division_code)
            .execute(&mut *tx)
            .await
            .map_err(database_error)?;
        }

        if let Some(address) = &details.address {
            sqlx::query(
                r#"
                INSERT INTO address (user_id, legal_address, registration_address, actual_address)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (user_id) DO UPDATE SET
                    legal_address = EXCLUDED.legal_address,
                    registration_address = EXCLUDED.registration_address,
                    actual_address = EXCLUDED.actual_address
                "#,
            )
            .bind(id.0)
            .bind(&address.legal_address)
            .bind(&address.registration_address)
            .bind(&address.actual_address)
            .execute(&mut *tx)
            .await
            .map_err(database_error)?;
        }

        if let Some(bank_details) = &details.bank_details {
            sqlx::query(
                r#"
                INSERT INTO bank_details (
                    user_id, bic, bank_name, correspondent_account, current_account, comment
                )
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (user_id) DO UPDATE SET
                    bic = EXCLUDED.bic,
                    bank_name = EXCLUDED.bank_name,
                    correspondent_account = EXCLUDED.correspondent_account,
                    current_account = EXCLUDED.current_account,
                    comment = EXCLUDED.comment
                "#,
            )
            .bind(id.0)
            .bind(&bank_details.bic)
            .bind(&bank_details.bank_name)
            .bind(&bank_details.correspondent_account)
            .bind(&bank_details.current_account)
            .bind(&bank_details.comment)
            .execute(&mut *tx)
            .await
            .map_err(database_error)?;
        }

        if let Some(contacts) = &details.contacts {
            sqlx::query(
                r#"
                INSERT INTO contacts (
                    user_id, personal_phone, extra_phone, public_phone, email, whatsapp, telegram
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                ON CONFLICT (user_id) DO UPDATE SET
                    personal_phone = EXCLUDED.personal_phone,
                    extra_phone = EXCLUDED.extra_phone,
                    public_phone = EXCLUDED.public_phone,
                    email = EXCLUDED.email,
                    whatsapp = EXCLUDED.whatsapp,
                    telegram = EXCLUDED.telegram
                "#,
            )
            .bind(id.0)
            .bind(&contacts.personal_phone)
            .bind(&contacts.extra_phone)
            .bind(&contacts.public_phone)
            .bind(&contacts.email)
            .bind(&contacts.whatsapp)
            .bind(&contacts.telegram)
            .execute(&mut *tx)
            .await
            .map_err(database_error)?;
        }

        tx.commit().await.map_err(database_error)?;

        Ok(())
    }
}

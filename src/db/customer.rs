use sqlx::sqlite::SqlitePool;

#[derive(Clone)]
pub struct CustomerStore {
    pool: SqlitePool,
}

/// Full customer record as stored. Not serializable: the password hash must
/// never reach a response body; use [`CustomerView`] for API output.
#[derive(Debug, Clone)]
pub struct Customer {
    pub id: i64,
    pub uuid: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub street: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub enabled: bool,
    pub locked: bool,
    pub account_expired: bool,
    pub credentials_expired: bool,
}

/// Profile fields supplied by clients on create/update.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct CustomerProfile {
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
}

/// Public customer view for API responses. Does not expose internal database
/// IDs or the password hash.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CustomerView {
    pub uuid: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub street: String,
    pub address: String,
    pub city: String,
    pub state: String,
}

impl From<&Customer> for CustomerView {
    fn from(c: &Customer) -> Self {
        Self {
            uuid: c.uuid.clone(),
            email: c.email.clone(),
            first_name: c.first_name.clone(),
            last_name: c.last_name.clone(),
            phone: c.phone.clone(),
            street: c.street.clone(),
            address: c.address.clone(),
            city: c.city.clone(),
            state: c.state.clone(),
        }
    }
}

#[derive(sqlx::FromRow)]
struct CustomerRow {
    id: i64,
    uuid: String,
    email: String,
    password_hash: String,
    first_name: String,
    last_name: String,
    phone: String,
    street: String,
    address: String,
    city: String,
    state: String,
    enabled: i32,
    locked: i32,
    account_expired: i32,
    credentials_expired: i32,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Self {
            id: row.id,
            uuid: row.uuid,
            email: row.email,
            password_hash: row.password_hash,
            first_name: row.first_name,
            last_name: row.last_name,
            phone: row.phone,
            street: row.street,
            address: row.address,
            city: row.city,
            state: row.state,
            enabled: row.enabled != 0,
            locked: row.locked != 0,
            account_expired: row.account_expired != 0,
            credentials_expired: row.credentials_expired != 0,
        }
    }
}

const CUSTOMER_COLUMNS: &str = "id, uuid, email, password_hash, first_name, last_name, phone, \
     street, address, city, state, enabled, locked, account_expired, credentials_expired";

impl CustomerStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new customer. Returns the row ID.
    /// Synced records that cannot log in pass an empty password hash.
    pub async fn create(
        &self,
        uuid: &str,
        password_hash: &str,
        profile: &CustomerProfile,
    ) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO customers (uuid, email, password_hash, first_name, last_name, phone, \
             street, address, city, state) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(uuid)
        .bind(&profile.email)
        .bind(password_hash)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(&profile.phone)
        .bind(&profile.street)
        .bind(&profile.address)
        .bind(&profile.city)
        .bind(&profile.state)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// Update the profile fields of an existing customer.
    pub async fn update(&self, uuid: &str, profile: &CustomerProfile) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE customers SET email = ?, first_name = ?, last_name = ?, phone = ?, \
             street = ?, address = ?, city = ?, state = ? WHERE uuid = ?",
        )
        .bind(&profile.email)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(&profile.phone)
        .bind(&profile.street)
        .bind(&profile.address)
        .bind(&profile.city)
        .bind(&profile.state)
        .bind(uuid)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Get a customer by UUID.
    pub async fn get_by_uuid(&self, uuid: &str) -> Result<Option<Customer>, sqlx::Error> {
        let row: Option<CustomerRow> = sqlx::query_as(&format!(
            "SELECT {} FROM customers WHERE uuid = ?",
            CUSTOMER_COLUMNS
        ))
        .bind(uuid)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Customer::from))
    }

    /// Get a customer by email. This is the account lookup used by both the
    /// login path and per-request authentication.
    pub async fn get_by_email(&self, email: &str) -> Result<Option<Customer>, sqlx::Error> {
        let row: Option<CustomerRow> = sqlx::query_as(&format!(
            "SELECT {} FROM customers WHERE email = ?",
            CUSTOMER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Customer::from))
    }

    /// Delete a customer by UUID.
    pub async fn delete(&self, uuid: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM customers WHERE uuid = ?")
            .bind(uuid)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List all customers in insertion order.
    pub async fn list_all(&self) -> Result<Vec<Customer>, sqlx::Error> {
        let rows: Vec<CustomerRow> = sqlx::query_as(&format!(
            "SELECT {} FROM customers ORDER BY id",
            CUSTOMER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Customer::from).collect())
    }

    /// List one page of customers. Pages are zero-based.
    pub async fn list_page(
        &self,
        page_no: u32,
        page_size: u32,
    ) -> Result<Vec<Customer>, sqlx::Error> {
        let rows: Vec<CustomerRow> = sqlx::query_as(&format!(
            "SELECT {} FROM customers ORDER BY id LIMIT ? OFFSET ?",
            CUSTOMER_COLUMNS
        ))
        .bind(page_size as i64)
        .bind(page_no as i64 * page_size as i64)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Customer::from).collect())
    }

    /// Count all customers.
    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0)
    }

    /// Set the account-state flags for a customer.
    pub async fn set_account_flags(
        &self,
        uuid: &str,
        enabled: bool,
        locked: bool,
        account_expired: bool,
        credentials_expired: bool,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE customers SET enabled = ?, locked = ?, account_expired = ?, \
             credentials_expired = ? WHERE uuid = ?",
        )
        .bind(enabled as i32)
        .bind(locked as i32)
        .bind(account_expired as i32)
        .bind(credentials_expired as i32)
        .bind(uuid)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

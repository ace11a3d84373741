//! Initial database migration.
//!
//! Creates the crediário schema: customers, sales, sale items,
//! payments, and batch payments with their allocation details.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: CUSTOMERS
        // ============================================================
        db.execute_unprepared(CUSTOMERS_SQL).await?;

        // ============================================================
        // PART 3: SALES & LINE ITEMS
        // ============================================================
        db.execute_unprepared(SALES_SQL).await?;
        db.execute_unprepared(SALE_ITEMS_SQL).await?;

        // ============================================================
        // PART 4: PAYMENTS
        // ============================================================
        db.execute_unprepared(BATCH_PAYMENTS_SQL).await?;
        db.execute_unprepared(BATCH_PAYMENT_DETAILS_SQL).await?;
        db.execute_unprepared(PAYMENTS_SQL).await?;
        db.execute_unprepared(SALES_BATCH_FK_SQL).await?;

        // ============================================================
        // PART 5: TRIGGERS & FUNCTIONS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Sale lifecycle
CREATE TYPE sale_status AS ENUM ('open', 'paid');

-- Payment method
CREATE TYPE payment_method AS ENUM ('cash', 'card', 'pix');
";

const CUSTOMERS_SQL: &str = r"
CREATE TABLE customers (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    cpf VARCHAR(11),
    phone VARCHAR(30),
    address VARCHAR(500),
    credit_limit NUMERIC(12, 2) NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT true,
    notes TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_customers_credit_limit CHECK (credit_limit >= 0)
);

-- CPF is stored digits-only; uniqueness applies only when present
CREATE UNIQUE INDEX idx_customers_cpf ON customers(cpf) WHERE cpf IS NOT NULL;
CREATE INDEX idx_customers_name ON customers(name);
CREATE INDEX idx_customers_active ON customers(is_active) WHERE is_active = true;
";

const SALES_SQL: &str = r"
CREATE TABLE sales (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    customer_id UUID NOT NULL REFERENCES customers(id),
    sale_date DATE NOT NULL,
    due_date DATE NOT NULL,
    subtotal NUMERIC(12, 2) NOT NULL,
    total NUMERIC(12, 2) NOT NULL,
    status sale_status NOT NULL DEFAULT 'open',
    is_remainder BOOLEAN NOT NULL DEFAULT false,
    batch_payment_id UUID,
    payment_date DATE,
    notes TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_sales_total CHECK (total > 0),
    CONSTRAINT chk_sales_dates CHECK (due_date >= sale_date)
);

CREATE INDEX idx_sales_customer ON sales(customer_id);
CREATE INDEX idx_sales_status ON sales(status);
CREATE INDEX idx_sales_due_date ON sales(due_date) WHERE status = 'open';
CREATE INDEX idx_sales_batch ON sales(batch_payment_id) WHERE batch_payment_id IS NOT NULL;
";

const SALE_ITEMS_SQL: &str = r"
CREATE TABLE sale_items (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    sale_id UUID NOT NULL REFERENCES sales(id) ON DELETE CASCADE,
    description VARCHAR(255) NOT NULL,
    quantity NUMERIC(9, 3) NOT NULL,
    unit_price NUMERIC(12, 2) NOT NULL,
    subtotal NUMERIC(12, 2) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_sale_items_quantity CHECK (quantity > 0),
    CONSTRAINT chk_sale_items_unit_price CHECK (unit_price > 0)
);

CREATE INDEX idx_sale_items_sale ON sale_items(sale_id);
";

const BATCH_PAYMENTS_SQL: &str = r"
CREATE TABLE batch_payments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    customer_id UUID NOT NULL REFERENCES customers(id),
    total_balance NUMERIC(12, 2) NOT NULL,
    amount_paid NUMERIC(12, 2) NOT NULL,
    remainder NUMERIC(12, 2) NOT NULL DEFAULT 0,
    method payment_method NOT NULL,
    tendered NUMERIC(12, 2),
    change_due NUMERIC(12, 2),
    payment_date DATE NOT NULL,
    notes TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_batch_payments_amount CHECK (amount_paid > 0),
    CONSTRAINT chk_batch_payments_remainder CHECK (remainder >= 0)
);

CREATE INDEX idx_batch_payments_customer ON batch_payments(customer_id);
";

const BATCH_PAYMENT_DETAILS_SQL: &str = r"
CREATE TABLE batch_payment_details (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    batch_payment_id UUID NOT NULL REFERENCES batch_payments(id) ON DELETE CASCADE,
    sale_id UUID NOT NULL REFERENCES sales(id),
    original_balance NUMERIC(12, 2) NOT NULL,
    amount_paid NUMERIC(12, 2) NOT NULL,
    settled BOOLEAN NOT NULL DEFAULT false,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_batch_details_amount CHECK (amount_paid >= 0)
);

CREATE INDEX idx_batch_details_batch ON batch_payment_details(batch_payment_id);
CREATE INDEX idx_batch_details_sale ON batch_payment_details(sale_id);
";

const PAYMENTS_SQL: &str = r"
CREATE TABLE payments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    sale_id UUID NOT NULL REFERENCES sales(id) ON DELETE CASCADE,
    amount NUMERIC(12, 2) NOT NULL,
    method payment_method NOT NULL,
    tendered NUMERIC(12, 2),
    change_due NUMERIC(12, 2),
    payment_date DATE NOT NULL,
    notes TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_payments_amount CHECK (amount > 0)
);

CREATE INDEX idx_payments_sale ON payments(sale_id);
CREATE INDEX idx_payments_date ON payments(payment_date);
";

// Added after batch_payments exists; sales is created first.
const SALES_BATCH_FK_SQL: &str = r"
ALTER TABLE sales
    ADD CONSTRAINT fk_sales_batch_payment
    FOREIGN KEY (batch_payment_id) REFERENCES batch_payments(id);
";

const TRIGGERS_SQL: &str = r"
-- ============================================================
-- FUNCTION: set_updated_at
-- Keeps updated_at current on row modification
-- ============================================================
CREATE OR REPLACE FUNCTION set_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = now();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_customers_updated_at
BEFORE UPDATE ON customers
FOR EACH ROW
EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_sales_updated_at
BEFORE UPDATE ON sales
FOR EACH ROW
EXECUTE FUNCTION set_updated_at();
";

const DROP_ALL_SQL: &str = r"
-- ============================================================
-- DROP ALL: Rollback migration
-- Order matters due to foreign key constraints
-- ============================================================

-- Drop triggers
DROP TRIGGER IF EXISTS trg_sales_updated_at ON sales;
DROP TRIGGER IF EXISTS trg_customers_updated_at ON customers;

-- Drop functions
DROP FUNCTION IF EXISTS set_updated_at();

-- Drop tables (reverse order of creation)
ALTER TABLE sales DROP CONSTRAINT IF EXISTS fk_sales_batch_payment;
DROP TABLE IF EXISTS payments CASCADE;
DROP TABLE IF EXISTS batch_payment_details CASCADE;
DROP TABLE IF EXISTS batch_payments CASCADE;
DROP TABLE IF EXISTS sale_items CASCADE;
DROP TABLE IF EXISTS sales CASCADE;
DROP TABLE IF EXISTS customers CASCADE;

-- Drop enums
DROP TYPE IF EXISTS payment_method;
DROP TYPE IF EXISTS sale_status;
";

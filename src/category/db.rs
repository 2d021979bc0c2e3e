//! Database operations for categories and category groups.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    category::{Category, CategoryGroup, CategoryGroupId, CategoryId, GroupType},
};

/// Initialize the category group table.
///
/// Must run before [create_category_table] since categories reference it.
pub fn create_category_group_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS category_group (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            sort_order INTEGER,
            type TEXT NOT NULL DEFAULT 'expense' CHECK (type IN ('expense', 'income'))
        );",
        (),
    )?;

    Ok(())
}

/// Initialize the category table.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            group_id INTEGER REFERENCES category_group(id) ON DELETE SET NULL
        );",
        (),
    )?;

    Ok(())
}

/// Create a category and return it with its generated ID.
///
/// # Errors
/// Returns [Error::EmptyCategoryName] if `name` is blank, or
/// [Error::DuplicateCategoryName] if a category with that name already exists.
pub fn create_category(name: &str, connection: &Connection) -> Result<Category, Error> {
    let name = name.trim();

    if name.is_empty() {
        return Err(Error::EmptyCategoryName);
    }

    connection.execute("INSERT INTO category (name) VALUES (?1);", (name,))?;

    let id = connection.last_insert_rowid();

    Ok(Category {
        id,
        name: name.to_owned(),
        group_id: None,
    })
}

/// Retrieve a single category by ID.
pub fn get_category(category_id: CategoryId, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare("SELECT id, name, group_id FROM category WHERE id = :id;")?
        .query_row(&[(":id", &category_id)], map_row_to_category)
        .map_err(|error| error.into())
}

/// Retrieve all categories ordered alphabetically by name.
pub fn get_all_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare("SELECT id, name, group_id FROM category ORDER BY name ASC;")?
        .query_map([], map_row_to_category)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Delete a category by ID.
///
/// Transactions keep their rows and lose the category reference via the
/// foreign key's SET NULL action.
///
/// # Errors
/// Returns [Error::CategoryInUse] if any recurring rule references the
/// category, or [Error::DeleteMissingCategory] if it doesn't exist.
pub fn delete_category(category_id: CategoryId, connection: &Connection) -> Result<(), Error> {
    let rule_count: i64 = connection.query_one(
        "SELECT COUNT(1) FROM recurring WHERE category_id = ?1",
        [category_id],
        |row| row.get(0),
    )?;

    if rule_count > 0 {
        return Err(Error::CategoryInUse);
    }

    let rows_affected = connection.execute("DELETE FROM category WHERE id = ?1", [category_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingCategory);
    }

    Ok(())
}

/// Assign a category to a group, or un-group it when `group_id` is `None`.
///
/// # Errors
/// Returns [Error::NotFound] if `category_id` does not refer to a category in
/// the database.
pub fn set_category_group(
    category_id: CategoryId,
    group_id: Option<CategoryGroupId>,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE category SET group_id = ?1 WHERE id = ?2",
        (group_id, category_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Create a category group and return it with its generated ID.
///
/// # Errors
/// Returns [Error::EmptyGroupName] if `name` is blank, or
/// [Error::DuplicateGroupName] if a group with that name already exists.
pub fn create_category_group(
    name: &str,
    group_type: GroupType,
    sort_order: Option<i64>,
    connection: &Connection,
) -> Result<CategoryGroup, Error> {
    let name = name.trim();

    if name.is_empty() {
        return Err(Error::EmptyGroupName);
    }

    connection.execute(
        "INSERT INTO category_group (name, sort_order, type) VALUES (?1, ?2, ?3);",
        (name, sort_order, group_type.as_str()),
    )?;

    let id = connection.last_insert_rowid();

    Ok(CategoryGroup {
        id,
        name: name.to_owned(),
        sort_order,
        group_type,
    })
}

/// Delete a category group by ID.
///
/// Member categories are un-grouped via the foreign key's SET NULL action.
///
/// # Errors
/// Returns [Error::DeleteMissingGroup] if `group_id` does not refer to a
/// group in the database.
pub fn delete_category_group(
    group_id: CategoryGroupId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected =
        connection.execute("DELETE FROM category_group WHERE id = ?1", [group_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingGroup);
    }

    Ok(())
}

/// Retrieve all groups in display order: explicit sort order first, then
/// alphabetical, with un-ordered groups last.
pub fn get_all_category_groups(connection: &Connection) -> Result<Vec<CategoryGroup>, Error> {
    connection
        .prepare(
            "SELECT id, name, sort_order, type FROM category_group
            ORDER BY sort_order IS NULL, sort_order, name;",
        )?
        .query_map([], map_row_to_group)?
        .map(|maybe_group| maybe_group.map_err(|error| error.into()))
        .collect()
}

fn map_row_to_category(row: &Row) -> Result<Category, rusqlite::Error> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        group_id: row.get(2)?,
    })
}

fn map_row_to_group(row: &Row) -> Result<CategoryGroup, rusqlite::Error> {
    let raw_type: String = row.get(3)?;
    let group_type = raw_type.parse().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            rusqlite::types::Type::Text,
            format!("unknown group type {raw_type}").into(),
        )
    })?;

    Ok(CategoryGroup {
        id: row.get(0)?,
        name: row.get(1)?,
        sort_order: row.get(2)?,
        group_type,
    })
}

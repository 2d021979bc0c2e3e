//! Database operations for tags.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    tag::{Tag, TagColor, TagId, TagName},
};

/// Create a tag and return it with its generated ID.
pub fn create_tag(name: TagName, color: TagColor, connection: &Connection) -> Result<Tag, Error> {
    connection.execute(
        "INSERT INTO tag (name, color) VALUES (?1, ?2);",
        (name.as_ref(), color.as_ref()),
    )?;

    let id = connection.last_insert_rowid();

    Ok(Tag { id, name, color })
}

/// Retrieve a single tag by ID.
pub fn get_tag(tag_id: TagId, connection: &Connection) -> Result<Tag, Error> {
    connection
        .prepare("SELECT id, name, color FROM tag WHERE id = :id;")?
        .query_row(&[(":id", &tag_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all tags ordered alphabetically by name.
pub fn get_all_tags(connection: &Connection) -> Result<Vec<Tag>, Error> {
    connection
        .prepare("SELECT id, name, color FROM tag ORDER BY name ASC;")?
        .query_map([], map_row)?
        .map(|maybe_tag| maybe_tag.map_err(|error| error.into()))
        .collect()
}

/// Delete a tag by ID. Returns an error if the tag doesn't exist.
///
/// Rows in the transaction-tag join table are removed by the foreign key
/// cascade.
pub fn delete_tag(tag_id: TagId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM tag WHERE id = ?1", [tag_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTag);
    }

    Ok(())
}

/// Initialize the tag table.
pub fn create_tag_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS tag (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            color TEXT NOT NULL DEFAULT '#64748b'
        );",
        (),
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Tag, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let raw_color: String = row.get(2)?;

    Ok(Tag {
        id,
        name: TagName::new_unchecked(&raw_name),
        color: TagColor::new_unchecked(&raw_color),
    })
}

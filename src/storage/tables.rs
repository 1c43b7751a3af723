use redb::TableDefinition;

/// Draft records: uuid -> DraftRecord (msgpack)
pub const DRAFTS: TableDefinition<&str, &[u8]> = TableDefinition::new("drafts");

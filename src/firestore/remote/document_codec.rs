//! `Document`, `BatchGetDocumentsResponse` and `Write`

use super::value_codec::{read_map_entry, read_timestamp, write_fields, write_timestamp};
use super::Serializer;
use crate::error::Result;
use crate::firestore::document::MaybeDocument;
use crate::firestore::document_key::DocumentKey;
use crate::firestore::field_path::FieldPath;
use crate::firestore::field_value::ObjectValue;
use crate::firestore::mutation::{Mutation, Precondition};
use crate::firestore::snapshot_version::SnapshotVersion;
use crate::wire::{Reader, Writer};

// Document
const DOCUMENT_NAME: u32 = 1;
const DOCUMENT_FIELDS: u32 = 2;
const DOCUMENT_CREATE_TIME: u32 = 3;
const DOCUMENT_UPDATE_TIME: u32 = 4;

// BatchGetDocumentsResponse
const RESPONSE_FOUND: u32 = 1;
const RESPONSE_MISSING: u32 = 2;
const RESPONSE_READ_TIME: u32 = 4;

// Write
const WRITE_UPDATE: u32 = 1;
const WRITE_DELETE: u32 = 2;
const WRITE_UPDATE_MASK: u32 = 3;
const WRITE_CURRENT_DOCUMENT: u32 = 4;

// DocumentMask, Precondition
const MASK_FIELD_PATHS: u32 = 1;
const PRECONDITION_EXISTS: u32 = 1;
const PRECONDITION_UPDATE_TIME: u32 = 2;

impl Serializer {
    /// Encode a document for sending to the backend.
    ///
    /// Only the name and fields are written; create and update times are
    /// assigned by the server.
    pub fn encode_document(&self, key: &DocumentKey, value: &ObjectValue) -> Vec<u8> {
        let mut writer = Writer::new();
        self.write_document(&mut writer, key, value);
        writer.into_bytes()
    }

    /// Decode a bare `Document` message into a found document
    pub fn decode_document(&self, bytes: &[u8]) -> Result<MaybeDocument> {
        let mut reader = Reader::new(bytes);
        let document = self.read_document(&mut reader);
        reader.into_result(document)
    }

    /// Decode a `BatchGetDocumentsResponse`.
    ///
    /// `found` yields a [`MaybeDocument::Document`] versioned by its update
    /// time, `missing` yields a [`MaybeDocument::NoDocument`] versioned by the
    /// response read time. A response with neither is data loss.
    pub fn decode_maybe_document(&self, bytes: &[u8]) -> Result<MaybeDocument> {
        let mut reader = Reader::new(bytes);

        let mut found = None;
        let mut missing = None;
        let mut read_time = SnapshotVersion::none();

        reader.read_message(|r, tag| match tag.field_number {
            RESPONSE_FOUND => {
                found = r.read_nested(tag, |r| self.read_document(r));
                missing = None;
                true
            }
            RESPONSE_MISSING => {
                let name = r.read_string(tag);
                missing = self.read_key(r, &name);
                found = None;
                true
            }
            RESPONSE_READ_TIME => {
                if let Some(ts) = r.read_nested(tag, read_timestamp) {
                    read_time = SnapshotVersion::new(ts);
                }
                true
            }
            // transaction (3) is ignored
            _ => false,
        });

        let document = match (found, missing) {
            (Some(document), _) => document,
            (None, Some(key)) => MaybeDocument::NoDocument {
                key,
                version: read_time,
            },
            (None, None) => {
                reader.fail("BatchGetDocumentsResponse has neither found nor missing set");
                MaybeDocument::Invalid
            }
        };
        reader.into_result(document)
    }

    /// Encode a mutation as a `Write` message
    pub fn encode_mutation(&self, mutation: &Mutation) -> Vec<u8> {
        let mut writer = Writer::new();

        match mutation {
            Mutation::Set { key, value, .. } => {
                writer.write_nested(WRITE_UPDATE, |w| self.write_document(w, key, value));
            }
            Mutation::Patch {
                key, value, mask, ..
            } => {
                writer.write_nested(WRITE_UPDATE, |w| self.write_document(w, key, value));
                writer.write_nested(WRITE_UPDATE_MASK, |w| {
                    for path in mask {
                        w.write_string(MASK_FIELD_PATHS, &path.canonical_string());
                    }
                });
            }
            Mutation::Delete { key, .. } => {
                writer.write_string(WRITE_DELETE, &self.encode_key(key));
            }
        }

        match mutation.precondition() {
            Precondition::None => {}
            Precondition::Exists(exists) => {
                writer.write_nested(WRITE_CURRENT_DOCUMENT, |w| {
                    w.write_bool(PRECONDITION_EXISTS, exists)
                });
            }
            Precondition::UpdateTime(version) => {
                writer.write_nested(WRITE_CURRENT_DOCUMENT, |w| {
                    w.write_nested(PRECONDITION_UPDATE_TIME, |w| {
                        write_timestamp(w, &version.timestamp())
                    })
                });
            }
        }

        writer.into_bytes()
    }

    /// Decode a `Write` message.
    ///
    /// `update` with a mask is a patch, without one a set. A write with
    /// neither `update` nor `delete` is data loss.
    pub fn decode_mutation(&self, bytes: &[u8]) -> Result<Mutation> {
        enum Operation {
            Update(DocumentKey, ObjectValue),
            Delete(DocumentKey),
        }

        let mut reader = Reader::new(bytes);

        let mut operation = None;
        let mut mask: Option<Vec<FieldPath>> = None;
        let mut precondition = Precondition::None;

        reader.read_message(|r, tag| match tag.field_number {
            WRITE_UPDATE => {
                operation = r
                    .read_nested(tag, |r| self.read_document(r))
                    .and_then(|document| match document {
                        MaybeDocument::Document { key, data, .. } => {
                            Some(Operation::Update(key, data))
                        }
                        _ => None,
                    });
                true
            }
            WRITE_DELETE => {
                let name = r.read_string(tag);
                operation = self.read_key(r, &name).map(Operation::Delete);
                true
            }
            WRITE_UPDATE_MASK => {
                mask = r.read_nested(tag, read_document_mask);
                true
            }
            WRITE_CURRENT_DOCUMENT => {
                if let Some(decoded) = r.read_nested(tag, read_precondition) {
                    precondition = decoded;
                }
                true
            }
            _ => false,
        });

        let mutation = match operation {
            Some(Operation::Update(key, value)) => match mask {
                Some(mask) => Mutation::Patch {
                    key,
                    value,
                    mask,
                    precondition,
                },
                None => Mutation::Set {
                    key,
                    value,
                    precondition,
                },
            },
            Some(Operation::Delete(key)) => Mutation::Delete { key, precondition },
            None => {
                reader.fail("Write has neither update nor delete set");
                Mutation::delete(DocumentKey::empty())
            }
        };
        reader.into_result(mutation)
    }

    fn write_document(&self, writer: &mut Writer, key: &DocumentKey, value: &ObjectValue) {
        writer.write_string(DOCUMENT_NAME, &self.encode_key(key));
        write_fields(writer, DOCUMENT_FIELDS, value);
    }

    fn read_document(&self, reader: &mut Reader<'_>) -> MaybeDocument {
        let mut key = None;
        let mut data = ObjectValue::empty();
        let mut version = SnapshotVersion::none();

        reader.read_message(|r, tag| match tag.field_number {
            DOCUMENT_NAME => {
                let name = r.read_string(tag);
                key = self.read_key(r, &name);
                true
            }
            DOCUMENT_FIELDS => {
                if let Some((name, value)) = r.read_nested(tag, read_map_entry) {
                    data.set(name, value);
                }
                true
            }
            DOCUMENT_CREATE_TIME => {
                // validated, then discarded
                r.read_nested(tag, read_timestamp);
                true
            }
            DOCUMENT_UPDATE_TIME => {
                if let Some(ts) = r.read_nested(tag, read_timestamp) {
                    version = SnapshotVersion::new(ts);
                }
                true
            }
            _ => false,
        });

        match key {
            Some(key) => MaybeDocument::Document { key, data, version },
            None => {
                reader.fail("Document has no name");
                MaybeDocument::Invalid
            }
        }
    }

    /// Decode a resource name of this database, recording any failure on
    /// `reader`
    fn read_key(&self, reader: &mut Reader<'_>, name: &str) -> Option<DocumentKey> {
        if !reader.is_ok() {
            return None;
        }
        match self.decode_key(name) {
            Ok(key) => Some(key),
            Err(err) => {
                reader.set_status(err);
                None
            }
        }
    }
}

fn read_document_mask(reader: &mut Reader<'_>) -> Vec<FieldPath> {
    let mut paths = Vec::new();
    reader.read_message(|r, tag| {
        if tag.field_number != MASK_FIELD_PATHS {
            return false;
        }
        let path = r.read_string(tag);
        if !r.is_ok() {
            return true;
        }
        match FieldPath::from_server_format(&path) {
            Ok(path) => paths.push(path),
            Err(err) => r.set_status(err),
        }
        true
    });
    paths
}

fn read_precondition(reader: &mut Reader<'_>) -> Precondition {
    let mut precondition = Precondition::None;
    reader.read_message(|r, tag| match tag.field_number {
        PRECONDITION_EXISTS => {
            precondition = Precondition::Exists(r.read_bool(tag));
            true
        }
        PRECONDITION_UPDATE_TIME => {
            if let Some(ts) = r.read_nested(tag, read_timestamp) {
                precondition = Precondition::UpdateTime(SnapshotVersion::new(ts));
            }
            true
        }
        _ => false,
    });
    precondition
}

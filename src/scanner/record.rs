use quick_xml::Reader;
use quick_xml::events::Event;

const RECORD: &[u8] = b"Record";
const OBJECT_TYPE: &[u8] = b"ObjectType";
const NUMERIC_PUB_DATE: &[u8] = b"NumericPubDate";

/// Separator placed between multiple `ObjectType` values of one record.
pub const LABEL_SEPARATOR: &str = "|";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    ObjectType,
    NumericPubDate,
}

impl Field {
    fn from_name(name: &[u8]) -> Option<Self> {
        match name {
            OBJECT_TYPE => Some(Self::ObjectType),
            NUMERIC_PUB_DATE => Some(Self::NumericPubDate),
            _ => None,
        }
    }
}

/// The fields of a `Record` document that the scanner consumes.
///
/// `None` means the element never appeared; an empty vector cannot occur.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFields {
    pub object_types: Option<Vec<String>>,
    pub numeric_pub_date: Option<Vec<String>>,
}

impl RecordFields {
    fn push(&mut self, field: Field, text: String) {
        let slot = match field {
            Field::ObjectType => &mut self.object_types,
            Field::NumericPubDate => &mut self.numeric_pub_date,
        };
        slot.get_or_insert_with(Vec::new).push(text);
    }

    /// Non-empty `ObjectType` values joined into one composite key.
    #[must_use]
    pub fn object_type_label(&self) -> Option<String> {
        let values = self.object_types.as_ref()?;
        let label = values
            .iter()
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .collect::<Vec<_>>()
            .join(LABEL_SEPARATOR);
        (!label.is_empty()).then_some(label)
    }

    /// `NumericPubDate` fragments concatenated with no separator.
    #[must_use]
    pub fn numeric_pub_date_text(&self) -> Option<String> {
        self.numeric_pub_date
            .as_ref()
            .map(|fragments| fragments.iter().map(|f| f.trim()).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedDocument {
    /// Well-formed, but the root element is not `Record`.
    NoRecord,
    Record(RecordFields),
}

/// Parses one article document, reading only the direct children of the
/// `Record` root that the scanner needs.
pub fn parse_document(xml: &str) -> Result<ParsedDocument, String> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut depth = 0usize;
    let mut root_seen = false;
    let mut is_record = false;
    let mut fields = RecordFields::default();
    let mut current: Option<(Field, String)> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| format!("at byte {}: {e}", reader.buffer_position()))?;

        match event {
            Event::Start(e) => {
                if depth == 0 {
                    if root_seen {
                        return Err("more than one root element".to_string());
                    }
                    root_seen = true;
                    is_record = e.name().as_ref() == RECORD;
                } else if is_record && depth == 1 {
                    current = Field::from_name(e.name().as_ref()).map(|f| (f, String::new()));
                }
                depth += 1;
            }
            Event::Empty(e) => {
                if depth == 0 {
                    if root_seen {
                        return Err("more than one root element".to_string());
                    }
                    root_seen = true;
                    is_record = e.name().as_ref() == RECORD;
                } else if is_record && depth == 1 {
                    if let Some(field) = Field::from_name(e.name().as_ref()) {
                        fields.push(field, String::new());
                    }
                }
            }
            Event::End(_) => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| "closing tag without an open element".to_string())?;
                if is_record && depth == 1 {
                    if let Some((field, text)) = current.take() {
                        fields.push(field, text);
                    }
                }
            }
            Event::Text(t) => {
                let text = t.unescape().map_err(|e| e.to_string())?;
                if depth == 0 {
                    if !text.trim().is_empty() {
                        return Err("text outside the root element".to_string());
                    }
                } else if depth == 2 {
                    if let Some((_, buf)) = current.as_mut() {
                        buf.push_str(&text);
                    }
                }
            }
            Event::CData(c) => {
                if depth == 2 {
                    if let Some((_, buf)) = current.as_mut() {
                        buf.push_str(&String::from_utf8_lossy(&c.into_inner()));
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !root_seen {
        return Err("no root element".to_string());
    }
    if depth != 0 {
        return Err("unexpected end of document".to_string());
    }

    if is_record {
        Ok(ParsedDocument::Record(fields))
    } else {
        Ok(ParsedDocument::NoRecord)
    }
}

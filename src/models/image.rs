use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

pub const UPLOAD_TIME_KEY: &str = "uploadTime";

/// Image metadata exactly as returned by the backend in the `data` object.
///
/// The object is passed through verbatim; accessors cover the fields the
/// PixelDock backend is known to send and return `None` on missing or mistyped values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageMetadata(Map<String, Value>);

impl ImageMetadata {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Backend ids are numeric, but string ids are accepted too.
    pub fn id(&self) -> Option<String> {
        match self.0.get("id")? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn file_name(&self) -> Option<&str> {
        self.str_field("fileName")
    }

    pub fn original_file_name(&self) -> Option<&str> {
        self.str_field("originalFileName")
    }

    pub fn file_url(&self) -> Option<&str> {
        self.str_field("fileUrl")
    }

    pub fn content_type(&self) -> Option<&str> {
        self.str_field("contentType")
    }

    pub fn file_size(&self) -> Option<u64> {
        self.0.get("fileSize").and_then(Value::as_u64)
    }

    pub fn raw_upload_time(&self) -> Option<&Value> {
        self.0.get(UPLOAD_TIME_KEY)
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }
}

/// One completed upload as kept in the store's history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadRecord {
    #[serde(flatten)]
    metadata: ImageMetadata,
    #[serde(rename = "uploadTime", serialize_with = "serialize_rfc3339")]
    upload_time: DateTime<Utc>,
}

impl UploadRecord {
    /// Copies every field of `data` and replaces `uploadTime` with the normalized
    /// value. Unreadable timestamps fall back to `received_at`.
    pub fn from_metadata(data: &ImageMetadata, received_at: DateTime<Utc>) -> Self {
        let upload_time = match data.raw_upload_time() {
            Some(raw) => parse_upload_time(raw).unwrap_or_else(|| {
                log::warn!(
                    "Unrecognized uploadTime {} for image {:?}, using receipt time",
                    raw,
                    data.id()
                );
                received_at
            }),
            None => {
                log::warn!(
                    "Upload response for image {:?} has no uploadTime, using receipt time",
                    data.id()
                );
                received_at
            }
        };

        let mut fields = data.fields().clone();
        fields.remove(UPLOAD_TIME_KEY);
        Self {
            metadata: ImageMetadata(fields),
            upload_time,
        }
    }

    pub fn upload_time(&self) -> DateTime<Utc> {
        self.upload_time
    }

    /// Backend fields, without the raw `uploadTime`.
    pub fn metadata(&self) -> &ImageMetadata {
        &self.metadata
    }

    pub fn id(&self) -> Option<String> {
        self.metadata.id()
    }

    pub fn file_url(&self) -> Option<&str> {
        self.metadata.file_url()
    }
}

fn serialize_rfc3339<S: Serializer>(time: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&time.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Converts a backend timestamp into UTC.
///
/// Accepted encodings:
/// - RFC 3339 strings (any offset)
/// - offset-less ISO strings, `T` or space separated, read as UTC
/// - numbers, read as epoch milliseconds
/// - `[year, month, day, hour, minute, second?, nanos?]` arrays, read as UTC
pub fn parse_upload_time(raw: &Value) -> Option<DateTime<Utc>> {
    match raw {
        Value::String(s) => parse_time_str(s.trim()),
        Value::Number(n) => {
            let millis = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            DateTime::<Utc>::from_timestamp_millis(millis)
        }
        Value::Array(parts) => parse_time_parts(parts),
        _ => None,
    }
}

fn parse_time_str(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = s.parse::<NaiveDateTime>() {
        return Some(naive.and_utc());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

fn parse_time_parts(parts: &[Value]) -> Option<DateTime<Utc>> {
    if parts.len() < 5 || parts.len() > 7 {
        return None;
    }
    let nums: Vec<i64> = parts.iter().map(Value::as_i64).collect::<Option<_>>()?;
    let part = |i: usize| nums.get(i).copied().unwrap_or(0);

    let date = NaiveDate::from_ymd_opt(
        i32::try_from(part(0)).ok()?,
        u32::try_from(part(1)).ok()?,
        u32::try_from(part(2)).ok()?,
    )?;
    let naive = date.and_hms_nano_opt(
        u32::try_from(part(3)).ok()?,
        u32::try_from(part(4)).ok()?,
        u32::try_from(part(5)).ok()?,
        u32::try_from(part(6)).ok()?,
    )?;
    Some(naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn metadata(value: Value) -> ImageMetadata {
        serde_json::from_value(value).unwrap()
    }

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_parse_rfc3339_zulu() {
        let t = parse_upload_time(&json!("2024-01-01T00:00:00Z")).unwrap();
        assert_eq!(t, utc(2024, 1, 1, 0, 0, 0));
    }

    #[test]
    fn test_parse_rfc3339_with_offset_converts_to_utc() {
        let t = parse_upload_time(&json!("2024-01-01T08:30:00+08:00")).unwrap();
        assert_eq!(t, utc(2024, 1, 1, 0, 30, 0));
    }

    #[test]
    fn test_parse_local_date_time_string_as_utc() {
        let t = parse_upload_time(&json!("2025-03-14T15:09:26.535")).unwrap();
        assert_eq!(t.timestamp_millis(), utc(2025, 3, 14, 15, 9, 26).timestamp_millis() + 535);

        let t = parse_upload_time(&json!("2025-03-14 15:09:26")).unwrap();
        assert_eq!(t, utc(2025, 3, 14, 15, 9, 26));
    }

    #[test]
    fn test_parse_epoch_millis() {
        let t = parse_upload_time(&json!(1_704_067_200_000i64)).unwrap();
        assert_eq!(t, utc(2024, 1, 1, 0, 0, 0));
    }

    #[test]
    fn test_parse_local_date_time_array() {
        let t = parse_upload_time(&json!([2024, 6, 30, 23, 59, 58, 1_000_000])).unwrap();
        assert_eq!(t.timestamp_millis(), utc(2024, 6, 30, 23, 59, 58).timestamp_millis() + 1);

        let t = parse_upload_time(&json!([2024, 6, 30, 23, 59])).unwrap();
        assert_eq!(t, utc(2024, 6, 30, 23, 59, 0));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_upload_time(&json!("yesterday")).is_none());
        assert!(parse_upload_time(&json!(null)).is_none());
        assert!(parse_upload_time(&json!({"epoch": 1})).is_none());
        assert!(parse_upload_time(&json!([2024, 13, 1, 0, 0])).is_none());
        assert!(parse_upload_time(&json!([2024, 1])).is_none());
    }

    #[test]
    fn test_metadata_accessors() {
        let meta = metadata(json!({
            "id": 1718000000000i64,
            "fileName": "3f2a.png",
            "originalFileName": "cat.png",
            "fileUrl": "http://minio:9000/images/uploads/2024/6/3f2a.png",
            "fileSize": 2048,
            "contentType": "image/png",
            "uploadTime": "2024-06-10T06:13:20"
        }));
        assert_eq!(meta.id().as_deref(), Some("1718000000000"));
        assert_eq!(meta.file_name(), Some("3f2a.png"));
        assert_eq!(meta.original_file_name(), Some("cat.png"));
        assert_eq!(meta.file_size(), Some(2048));
        assert_eq!(meta.content_type(), Some("image/png"));
        assert!(meta.file_url().unwrap().ends_with("3f2a.png"));
    }

    #[test]
    fn test_metadata_accessors_tolerate_wrong_types() {
        let meta = metadata(json!({"id": true, "fileSize": "big", "fileUrl": 7}));
        assert!(meta.id().is_none());
        assert!(meta.file_size().is_none());
        assert!(meta.file_url().is_none());
        assert!(meta.file_name().is_none());
    }

    #[test]
    fn test_record_copies_fields_and_normalizes_time() {
        let meta = metadata(json!({
            "id": "img1",
            "url": "/x.png",
            "uploadTime": "2024-01-01T00:00:00Z"
        }));
        let record = UploadRecord::from_metadata(&meta, utc(2030, 1, 1, 0, 0, 0));
        assert_eq!(record.id().as_deref(), Some("img1"));
        assert_eq!(record.metadata().get("url"), Some(&json!("/x.png")));
        assert_eq!(record.upload_time(), utc(2024, 1, 1, 0, 0, 0));
        assert!(record.metadata().raw_upload_time().is_none());
        // source metadata is untouched
        assert_eq!(meta.raw_upload_time(), Some(&json!("2024-01-01T00:00:00Z")));
    }

    #[test]
    fn test_record_falls_back_to_receipt_time() {
        let received = utc(2026, 10, 18, 12, 0, 0);
        let missing = UploadRecord::from_metadata(&metadata(json!({"id": 1})), received);
        assert_eq!(missing.upload_time(), received);

        let bad = UploadRecord::from_metadata(
            &metadata(json!({"id": 2, "uploadTime": "not a date"})),
            received,
        );
        assert_eq!(bad.upload_time(), received);
    }

    #[test]
    fn test_record_serializes_flat_with_rfc3339_time() {
        let meta = metadata(json!({
            "id": "img1",
            "fileUrl": "/x.png",
            "uploadTime": [2024, 1, 1, 0, 0, 0]
        }));
        let record = UploadRecord::from_metadata(&meta, Utc::now());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], "img1");
        assert_eq!(json["fileUrl"], "/x.png");
        assert_eq!(json["uploadTime"], "2024-01-01T00:00:00.000Z");
        assert!(json.get("metadata").is_none());
    }
}

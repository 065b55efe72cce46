//! Conversion from Bolt wire values to report-friendly property values

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use neo4rs::{BoltPoint2D, BoltPoint3D, BoltType};
use std::collections::BTreeMap;

use crate::models::PropertyValue;

/// Convert a Bolt value into a `PropertyValue`.
///
/// Temporal values are rendered as ISO-8601 text and points as
/// `point({srid, x, y[, z]})`; graph entities only keep their kind.
pub fn from_bolt(value: BoltType) -> PropertyValue {
    match value {
        BoltType::Null(_) => PropertyValue::Null,
        BoltType::Boolean(b) => PropertyValue::Boolean(b.value),
        BoltType::Integer(i) => PropertyValue::Integer(i.value),
        BoltType::Float(f) => PropertyValue::Float(f.value),
        BoltType::String(s) => PropertyValue::String(s.value),
        BoltType::List(list) => {
            PropertyValue::List(list.value.into_iter().map(from_bolt).collect())
        }
        BoltType::Map(map) => PropertyValue::Map(
            map.value
                .into_iter()
                .map(|(k, v)| (k.value, from_bolt(v)))
                .collect::<BTreeMap<_, _>>(),
        ),
        BoltType::Bytes(bytes) => PropertyValue::Bytes(bytes.value.len()),
        BoltType::Node(_) => PropertyValue::Graph("Node".to_string()),
        BoltType::Relation(_) | BoltType::UnboundedRelation(_) => {
            PropertyValue::Graph("Relationship".to_string())
        }
        BoltType::Path(_) => PropertyValue::Graph("Path".to_string()),
        BoltType::Point2D(p) => spatial("Point", point_2d(&p)),
        BoltType::Point3D(p) => spatial("Point", point_3d(&p)),
        BoltType::Duration(d) => temporal("Duration", iso_duration(d.into())),
        BoltType::Date(d) => temporal(
            "Date",
            checked("Date", NaiveDate::try_from(&d).map(|date| date.to_string())),
        ),
        BoltType::Time(t) => {
            let (time, offset): (NaiveTime, FixedOffset) = (&t).into();
            temporal("Time", format!("{time}{offset}"))
        }
        BoltType::LocalTime(t) => temporal("LocalTime", NaiveTime::from(&t).to_string()),
        BoltType::DateTime(dt) => temporal(
            "DateTime",
            checked(
                "DateTime",
                DateTime::<FixedOffset>::try_from(&dt).map(|dt| dt.to_rfc3339()),
            ),
        ),
        BoltType::LocalDateTime(dt) => temporal(
            "LocalDateTime",
            checked(
                "LocalDateTime",
                NaiveDateTime::try_from(&dt).map(|dt| dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string()),
            ),
        ),
        BoltType::DateTimeZoneId(dt) => temporal(
            "DateTime",
            checked(
                "DateTime",
                DateTime::<FixedOffset>::try_from(&dt)
                    .map(|parsed| format!("{}[{}]", parsed.to_rfc3339(), dt.tz_id())),
            ),
        ),
        #[allow(unreachable_patterns)]
        other => PropertyValue::Graph(format!("{other:?}")),
    }
}

fn checked(kind: &str, text: Result<String, neo4rs::Error>) -> String {
    text.unwrap_or_else(|_| format!("invalid {kind}"))
}

fn point_2d(p: &BoltPoint2D) -> String {
    format!(
        "point({{srid: {}, x: {}, y: {}}})",
        p.sr_id.value, p.x.value, p.y.value
    )
}

fn point_3d(p: &BoltPoint3D) -> String {
    format!(
        "point({{srid: {}, x: {}, y: {}, z: {}}})",
        p.sr_id.value, p.x.value, p.y.value, p.z.value
    )
}

/// `P[nD][T[nH][nM][n[.f]S]]`, months folded into seconds by the driver.
fn iso_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs();
    let nanos = duration.subsec_nanos();
    let (days, hours, minutes, seconds) =
        (secs / 86_400, secs % 86_400 / 3_600, secs % 3_600 / 60, secs % 60);

    let mut time = String::new();
    if hours > 0 {
        time.push_str(&format!("{hours}H"));
    }
    if minutes > 0 {
        time.push_str(&format!("{minutes}M"));
    }
    if nanos > 0 {
        let fraction = format!("{nanos:09}");
        time.push_str(&format!("{seconds}.{}S", fraction.trim_end_matches('0')));
    } else if seconds > 0 || (days == 0 && time.is_empty()) {
        time.push_str(&format!("{seconds}S"));
    }

    let mut out = String::from("P");
    if days > 0 {
        out.push_str(&format!("{days}D"));
    }
    if !time.is_empty() {
        out.push('T');
        out.push_str(&time);
    }
    out
}

fn temporal(kind: &str, text: String) -> PropertyValue {
    PropertyValue::Temporal {
        kind: kind.to_string(),
        text,
    }
}

fn spatial(kind: &str, text: String) -> PropertyValue {
    PropertyValue::Spatial {
        kind: kind.to_string(),
        text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neo4rs::{BoltFloat, BoltInteger, BoltList, Row};

    #[test]
    fn test_scalars() {
        assert_eq!(from_bolt(BoltType::from(42_i64)), PropertyValue::Integer(42));
        assert_eq!(from_bolt(BoltType::from("Alice")), PropertyValue::from("Alice"));
        assert_eq!(from_bolt(BoltType::from(true)), PropertyValue::Boolean(true));
        assert_eq!(from_bolt(BoltType::from(2.5_f64)), PropertyValue::Float(2.5));
    }

    #[test]
    fn test_temporal_and_spatial_values_from_row() {
        let date = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
        let point = BoltPoint2D {
            sr_id: BoltInteger::new(7203),
            x: BoltFloat::new(1.5),
            y: BoltFloat::new(-2.25),
        };
        let fields = BoltList::from(vec![BoltType::from("when"), BoltType::from("where")]);
        let data = BoltList::from(vec![BoltType::Date(date.into()), BoltType::Point2D(point)]);
        let row = Row::new(fields, data);

        let when = from_bolt(row.get::<BoltType>("when").unwrap());
        assert_eq!(
            when,
            PropertyValue::Temporal {
                kind: "Date".to_string(),
                text: "2020-01-02".to_string(),
            }
        );
        assert_eq!(when.to_string(), "2020-01-02");

        let place = from_bolt(row.get::<BoltType>("where").unwrap());
        assert_eq!(place.to_string(), "point({srid: 7203, x: 1.5, y: -2.25})");
        assert_eq!(place.type_name(), "Point");
    }

    #[test]
    fn test_datetimes_are_iso() {
        let naive = NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(5, 6, 7)
            .unwrap();
        let local = from_bolt(BoltType::LocalDateTime(naive.into()));
        assert_eq!(local.to_string(), "2024-03-04T05:06:07");

        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let zoned = naive.and_local_timezone(offset).unwrap();
        let dt = from_bolt(BoltType::DateTime(zoned.into()));
        assert_eq!(dt.to_string(), "2024-03-04T05:06:07+02:00");

        let time = NaiveTime::from_hms_opt(13, 37, 0).unwrap();
        let local_time = from_bolt(BoltType::LocalTime(time.into()));
        assert_eq!(local_time.to_string(), "13:37:00");
    }

    #[test]
    fn test_iso_duration() {
        use std::time::Duration;
        assert_eq!(iso_duration(Duration::from_secs(0)), "PT0S");
        assert_eq!(iso_duration(Duration::from_secs(90)), "PT1M30S");
        assert_eq!(iso_duration(Duration::from_secs(2 * 86_400)), "P2D");
        assert_eq!(
            iso_duration(Duration::new(86_400 + 3_600 + 1, 500_000_000)),
            "P1DT1H1.5S"
        );
    }

    #[test]
    fn test_list() {
        let bolt = BoltType::from(vec!["a", "b"]);
        assert_eq!(
            from_bolt(bolt),
            PropertyValue::List(vec!["a".into(), "b".into()])
        );
    }
}

//! Field tables for editing panels
//!
//! Each editable variant has a static table of `FieldSpec`s: a label, the
//! value kind with its integer range, and plain getter/setter functions.
//! Panels iterate a table to build their rows and write edits back through
//! it, so no field is ever looked up by reflection.

use crate::entities::*;
use crate::entity::{EntityKind, EntityMut, EntityRef};
use crate::names::{ObjectNameTable, INVALID_LABEL};
use pitlane_core::{PitlaneError, Result, Rotation, Vec3};

/// The kind of value a field holds
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldKind {
    Int { min: i64, max: i64 },
    Float,
    Vec3,
    /// Object type code, edited through the name table
    ObjectType,
    /// Index into another collection, -1 for none
    Ref(RefTarget),
}

/// Collection a reference field points into
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefTarget {
    EnemyPoints,
    CheckpointGroups,
    Routes,
}

impl RefTarget {
    pub fn collection(&self) -> &'static str {
        match self {
            RefTarget::EnemyPoints => "enemy_points",
            RefTarget::CheckpointGroups => "checkpoint_groups",
            RefTarget::Routes => "routes",
        }
    }
}

impl FieldKind {
    fn name(&self) -> &'static str {
        match self {
            FieldKind::Int { .. } => "integer",
            FieldKind::Float => "decimal",
            FieldKind::Vec3 => "vector",
            FieldKind::ObjectType => "object type",
            FieldKind::Ref(_) => "reference",
        }
    }
}

/// A field value passed between panels and entities
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldValue {
    Int(i64),
    Float(f32),
    Vec3(Vec3),
    /// `None` is the INVALID choice, which leaves the stored code alone
    ObjectCode(Option<u16>),
}

impl FieldValue {
    fn kind_name(&self) -> &'static str {
        match self {
            FieldValue::Int(_) => "integer",
            FieldValue::Float(_) => "decimal",
            FieldValue::Vec3(_) => "vector",
            FieldValue::ObjectCode(_) => "object type",
        }
    }

    /// Parse panel text for a field of `kind`
    pub fn parse(kind: FieldKind, text: &str, names: &ObjectNameTable) -> Result<Self> {
        let text = text.trim();
        let bad = |what: &str| PitlaneError::ParseError(format!("'{}' is not a valid {}", text, what));
        match kind {
            FieldKind::Int { .. } | FieldKind::Ref(_) => {
                text.parse().map(FieldValue::Int).map_err(|_| bad("integer"))
            }
            FieldKind::Float => text.parse().map(FieldValue::Float).map_err(|_| bad("decimal")),
            FieldKind::Vec3 => {
                let parts: Vec<f32> = text
                    .split(',')
                    .map(|p| p.trim().parse::<f32>())
                    .collect::<std::result::Result<_, _>>()
                    .map_err(|_| bad("vector"))?;
                match parts.as_slice() {
                    [x, y, z] => Ok(FieldValue::Vec3(Vec3::new(*x, *y, *z))),
                    _ => Err(bad("vector")),
                }
            }
            FieldKind::ObjectType if text == INVALID_LABEL => Ok(FieldValue::ObjectCode(None)),
            FieldKind::ObjectType => names
                .code(text)
                .map(|code| FieldValue::ObjectCode(Some(code)))
                .ok_or_else(|| bad("object name")),
        }
    }
}

/// One row of an editor table
pub struct FieldSpec<T> {
    pub label: &'static str,
    pub kind: FieldKind,
    pub editable: bool,
    pub get: fn(&T) -> FieldValue,
    /// Called only with a value already checked against `kind`
    pub set: fn(&mut T, FieldValue),
}

impl<T> FieldSpec<T> {
    pub fn read(&self, target: &T) -> FieldValue {
        (self.get)(target)
    }

    /// Text shown in the panel
    pub fn display(&self, target: &T, names: &ObjectNameTable) -> String {
        match self.read(target) {
            FieldValue::Int(n) => n.to_string(),
            FieldValue::Float(f) => f.to_string(),
            FieldValue::Vec3(v) => format!("{}, {}, {}", round3(v.x), round3(v.y), round3(v.z)),
            FieldValue::ObjectCode(Some(code)) => names.label(code).to_string(),
            FieldValue::ObjectCode(None) => INVALID_LABEL.to_string(),
        }
    }

    /// Validate and store a value
    pub fn write(&self, target: &mut T, value: FieldValue) -> Result<()> {
        if !self.editable {
            return Err(PitlaneError::ReadOnlyField(self.label.to_string()));
        }
        match (self.kind, value) {
            (FieldKind::Int { min, max }, FieldValue::Int(n)) => {
                if n < min || n > max {
                    return Err(PitlaneError::ValueOutOfRange {
                        field: self.label.to_string(),
                        min,
                        max,
                        value: n,
                    });
                }
            }
            (FieldKind::Ref(_), FieldValue::Int(n)) => {
                // Upper bounds depend on the course; CourseGraph::set_field checks them
                if n < IndexRef::NONE.raw() as i64 || n > i16::MAX as i64 {
                    return Err(PitlaneError::ValueOutOfRange {
                        field: self.label.to_string(),
                        min: IndexRef::NONE.raw() as i64,
                        max: i16::MAX as i64,
                        value: n,
                    });
                }
            }
            (FieldKind::Float, FieldValue::Float(_))
            | (FieldKind::Vec3, FieldValue::Vec3(_))
            | (FieldKind::ObjectType, FieldValue::ObjectCode(_)) => {}
            (kind, value) => {
                return Err(PitlaneError::InvalidFieldType {
                    expected: kind.name().to_string(),
                    got: value.kind_name().to_string(),
                })
            }
        }
        (self.set)(target, value);
        Ok(())
    }
}

fn round3(v: f32) -> f32 {
    (v * 1000.0).round() / 1000.0
}

macro_rules! int_field {
    ($label:literal, $field:ident: $ty:ty) => {
        int_field!(@build $label, $field: $ty, true)
    };
    ($label:literal, $field:ident: $ty:ty, readonly) => {
        int_field!(@build $label, $field: $ty, false)
    };
    (@build $label:literal, $field:ident: $ty:ty, $editable:expr) => {
        FieldSpec {
            label: $label,
            kind: FieldKind::Int {
                min: <$ty>::MIN as i64,
                max: <$ty>::MAX as i64,
            },
            editable: $editable,
            get: |t| FieldValue::Int(t.$field as i64),
            set: |t, v| {
                if let FieldValue::Int(n) = v {
                    t.$field = n as $ty;
                }
            },
        }
    };
}

/// Reference field, edited as its raw index
macro_rules! ref_field {
    ($label:literal, $field:ident -> $target:ident) => {
        FieldSpec {
            label: $label,
            kind: FieldKind::Ref(RefTarget::$target),
            editable: true,
            get: |t| FieldValue::Int(t.$field.raw() as i64),
            set: |t, v| {
                if let FieldValue::Int(n) = v {
                    t.$field = IndexRef(n as i16);
                }
            },
        }
    };
    ($label:literal, $field:ident[$i:literal] -> $target:ident) => {
        FieldSpec {
            label: $label,
            kind: FieldKind::Ref(RefTarget::$target),
            editable: true,
            get: |t| FieldValue::Int(t.$field[$i].raw() as i64),
            set: |t, v| {
                if let FieldValue::Int(n) = v {
                    t.$field[$i] = IndexRef(n as i16);
                }
            },
        }
    };
}

macro_rules! userdata_field {
    ($label:literal, $i:literal) => {
        FieldSpec {
            label: $label,
            kind: FieldKind::Int {
                min: i16::MIN as i64,
                max: i16::MAX as i64,
            },
            editable: true,
            get: |t: &MapObject| FieldValue::Int(t.userdata[$i] as i64),
            set: |t: &mut MapObject, v| {
                if let FieldValue::Int(n) = v {
                    t.userdata[$i] = n as i16;
                }
            },
        }
    };
}

macro_rules! vec3_field {
    ($label:literal, $field:ident) => {
        FieldSpec {
            label: $label,
            kind: FieldKind::Vec3,
            editable: true,
            get: |t| FieldValue::Vec3(t.$field),
            set: |t, v| {
                if let FieldValue::Vec3(p) = v {
                    t.$field = p;
                }
            },
        }
    };
}

pub static ENEMY_POINT_FIELDS: &[FieldSpec<EnemyPoint>] = &[
    vec3_field!("Position", position),
    int_field!("Point Setting", point_setting: u16),
    ref_field!("Link", link -> EnemyPoints),
    FieldSpec {
        label: "Scale",
        kind: FieldKind::Float,
        editable: true,
        get: |t| FieldValue::Float(t.scale),
        set: |t, v| {
            if let FieldValue::Float(f) = v {
                t.scale = f;
            }
        },
    },
    int_field!("Group Setting", group_setting: u16),
    // group membership is changed by moving the point, not by typing
    int_field!("Group", group: u8, readonly),
    int_field!("Point Setting 2", point_setting2: u8),
    int_field!("Unknown 1", unk1: u8),
    int_field!("Unknown 2", unk2: u16),
];

pub static CHECKPOINT_GROUP_FIELDS: &[FieldSpec<CheckpointGroup>] = &[
    int_field!("Group Link", group_link: u16),
    ref_field!("Previous Group 1", prev_groups[0] -> CheckpointGroups),
    ref_field!("Previous Group 2", prev_groups[1] -> CheckpointGroups),
    ref_field!("Previous Group 3", prev_groups[2] -> CheckpointGroups),
    ref_field!("Previous Group 4", prev_groups[3] -> CheckpointGroups),
    ref_field!("Next Group 1", next_groups[0] -> CheckpointGroups),
    ref_field!("Next Group 2", next_groups[1] -> CheckpointGroups),
    ref_field!("Next Group 3", next_groups[2] -> CheckpointGroups),
    ref_field!("Next Group 4", next_groups[3] -> CheckpointGroups),
];

pub static CHECKPOINT_FIELDS: &[FieldSpec<Checkpoint>] = &[
    vec3_field!("Start", start),
    vec3_field!("End", end),
    int_field!("Unknown 1", unk1: u8),
    int_field!("Unknown 2", unk2: u8),
    int_field!("Unknown 3", unk3: u8),
    int_field!("Unknown 4", unk4: u8),
];

pub static MAP_OBJECT_FIELDS: &[FieldSpec<MapObject>] = &[
    vec3_field!("Position", position),
    FieldSpec {
        label: "Rotation",
        kind: FieldKind::Vec3,
        editable: true,
        get: |t| FieldValue::Vec3(Vec3::new(t.rotation.x, t.rotation.y, t.rotation.z)),
        set: |t, v| {
            if let FieldValue::Vec3(r) = v {
                t.rotation = Rotation::new(r.x, r.y, r.z);
            }
        },
    },
    vec3_field!("Scale", scale),
    FieldSpec {
        label: "Object Type",
        kind: FieldKind::ObjectType,
        editable: true,
        get: |t| FieldValue::ObjectCode(Some(t.object_id)),
        set: |t, v| {
            if let FieldValue::ObjectCode(Some(code)) = v {
                t.object_id = code;
            }
        },
    },
    ref_field!("Path ID", path_id -> Routes),
    int_field!("Unknown 0x28", unk_28: u16),
    int_field!("Unknown 0x2A", unk_2a: u16),
    int_field!("Presence Filter", presence_filter: u8),
    int_field!("Presence", presence: u8),
    int_field!("Flag", unk_flag: u8),
    int_field!("Unknown 0x2F", unk_2f: u8),
    userdata_field!("Obj Data 1", 0),
    userdata_field!("Obj Data 2", 1),
    userdata_field!("Obj Data 3", 2),
    userdata_field!("Obj Data 4", 3),
    userdata_field!("Obj Data 5", 4),
    userdata_field!("Obj Data 6", 5),
    userdata_field!("Obj Data 7", 6),
    userdata_field!("Obj Data 8", 7),
];

/// An editor table for one variant
#[derive(Clone, Copy)]
pub enum FieldTable {
    EnemyPoint(&'static [FieldSpec<EnemyPoint>]),
    CheckpointGroup(&'static [FieldSpec<CheckpointGroup>]),
    Checkpoint(&'static [FieldSpec<Checkpoint>]),
    MapObject(&'static [FieldSpec<MapObject>]),
}

impl FieldTable {
    pub fn labels(&self) -> Vec<&'static str> {
        fn labels_of<T>(specs: &[FieldSpec<T>]) -> Vec<&'static str> {
            specs.iter().map(|s| s.label).collect()
        }
        match self {
            FieldTable::EnemyPoint(t) => labels_of(t),
            FieldTable::CheckpointGroup(t) => labels_of(t),
            FieldTable::Checkpoint(t) => labels_of(t),
            FieldTable::MapObject(t) => labels_of(t),
        }
    }

    /// Kind of the field with this label
    pub fn kind_of(&self, label: &str) -> Option<FieldKind> {
        fn find<T>(specs: &[FieldSpec<T>], label: &str) -> Option<FieldKind> {
            specs.iter().find(|s| s.label == label).map(|s| s.kind)
        }
        match self {
            FieldTable::EnemyPoint(t) => find(t, label),
            FieldTable::CheckpointGroup(t) => find(t, label),
            FieldTable::Checkpoint(t) => find(t, label),
            FieldTable::MapObject(t) => find(t, label),
        }
    }
}

/// Editor table for a variant, or `None` if it has no panel
pub fn field_table(kind: EntityKind) -> Option<FieldTable> {
    match kind {
        EntityKind::EnemyPoint => Some(FieldTable::EnemyPoint(ENEMY_POINT_FIELDS)),
        EntityKind::CheckpointGroup => Some(FieldTable::CheckpointGroup(CHECKPOINT_GROUP_FIELDS)),
        EntityKind::Checkpoint => Some(FieldTable::Checkpoint(CHECKPOINT_FIELDS)),
        EntityKind::MapObject => Some(FieldTable::MapObject(MAP_OBJECT_FIELDS)),
        _ => None,
    }
}

fn rows<T>(specs: &[FieldSpec<T>], target: &T, names: &ObjectNameTable) -> Vec<(&'static str, String)> {
    specs
        .iter()
        .map(|s| (s.label, s.display(target, names)))
        .collect()
}

fn write<T>(specs: &[FieldSpec<T>], kind: EntityKind, target: &mut T, label: &str, value: FieldValue) -> Result<()> {
    specs
        .iter()
        .find(|s| s.label == label)
        .ok_or_else(|| PitlaneError::UnknownField {
            kind: kind.name(),
            field: label.to_string(),
        })?
        .write(target, value)
}

/// Label/text rows for an entity, or `None` if its variant has no table
pub fn read_fields(entity: EntityRef<'_>, names: &ObjectNameTable) -> Option<Vec<(&'static str, String)>> {
    Some(match (field_table(entity.kind())?, entity) {
        (FieldTable::EnemyPoint(t), EntityRef::EnemyPoint(e)) => rows(t, e, names),
        (FieldTable::CheckpointGroup(t), EntityRef::CheckpointGroup(g)) => rows(t, g, names),
        (FieldTable::Checkpoint(t), EntityRef::Checkpoint(c)) => rows(t, c, names),
        (FieldTable::MapObject(t), EntityRef::MapObject(o)) => rows(t, o, names),
        _ => return None,
    })
}

/// Write one labelled field of an entity through its table
pub fn write_field(entity: EntityMut<'_>, label: &str, value: FieldValue) -> Result<()> {
    let kind = entity.kind();
    let unknown = || PitlaneError::UnknownField {
        kind: kind.name(),
        field: label.to_string(),
    };
    match (field_table(kind).ok_or_else(unknown)?, entity) {
        (FieldTable::EnemyPoint(t), EntityMut::EnemyPoint(e)) => write(t, kind, e, label, value),
        (FieldTable::CheckpointGroup(t), EntityMut::CheckpointGroup(g)) => write(t, kind, g, label, value),
        (FieldTable::Checkpoint(t), EntityMut::Checkpoint(c)) => write(t, kind, c, label, value),
        (FieldTable::MapObject(t), EntityMut::MapObject(o)) => write(t, kind, o, label, value),
        _ => Err(unknown()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> ObjectNameTable {
        ObjectNameTable::from_pairs([("GeoItemBox", 1), ("GeoCannon", 7)])
    }

    #[test]
    fn test_dispatch_table() {
        assert!(field_table(EntityKind::EnemyPoint).is_some());
        assert!(field_table(EntityKind::CheckpointGroup).is_some());
        assert!(field_table(EntityKind::MapObject).is_some());
        assert!(field_table(EntityKind::Camera).is_none());

        let labels = field_table(EntityKind::MapObject).unwrap().labels();
        assert!(labels.contains(&"Obj Data 8"));
        assert_eq!(labels.iter().filter(|l| l.starts_with("Obj Data")).count(), 8);
    }

    #[test]
    fn test_int_range_enforced() {
        let mut obj = MapObject::new(Vec3::ZERO, 1);
        let err = write_field(EntityMut::MapObject(&mut obj), "Presence", FieldValue::Int(256));
        assert!(matches!(err, Err(PitlaneError::ValueOutOfRange { max: 255, .. })));

        write_field(EntityMut::MapObject(&mut obj), "Presence", FieldValue::Int(255)).unwrap();
        assert_eq!(obj.presence, 255);

        write_field(EntityMut::MapObject(&mut obj), "Obj Data 3", FieldValue::Int(-32768)).unwrap();
        assert_eq!(obj.userdata[2], -32768);
    }

    #[test]
    fn test_type_mismatch_and_unknown_label() {
        let mut ep = EnemyPoint::new(Vec3::ZERO, 0);
        assert!(matches!(
            write_field(EntityMut::EnemyPoint(&mut ep), "Scale", FieldValue::Int(3)),
            Err(PitlaneError::InvalidFieldType { .. })
        ));
        assert!(matches!(
            write_field(EntityMut::EnemyPoint(&mut ep), "Colour", FieldValue::Int(3)),
            Err(PitlaneError::UnknownField { .. })
        ));
    }

    #[test]
    fn test_group_is_read_only() {
        let mut ep = EnemyPoint::new(Vec3::ZERO, 0);
        assert!(matches!(
            write_field(EntityMut::EnemyPoint(&mut ep), "Group", FieldValue::Int(2)),
            Err(PitlaneError::ReadOnlyField(_))
        ));
        assert_eq!(ep.group, 0);
    }

    #[test]
    fn test_reference_fields_name_their_target() {
        let table = field_table(EntityKind::EnemyPoint).unwrap();
        assert_eq!(table.kind_of("Link"), Some(FieldKind::Ref(RefTarget::EnemyPoints)));
        let table = field_table(EntityKind::MapObject).unwrap();
        assert_eq!(table.kind_of("Path ID"), Some(FieldKind::Ref(RefTarget::Routes)));
        let table = field_table(EntityKind::CheckpointGroup).unwrap();
        assert_eq!(
            table.kind_of("Next Group 4"),
            Some(FieldKind::Ref(RefTarget::CheckpointGroups))
        );
    }

    #[test]
    fn test_reference_accepts_sentinel_and_rejects_other_negatives() {
        let mut ep = EnemyPoint::new(Vec3::ZERO, 0);
        ep.link = IndexRef::to(0);
        write_field(EntityMut::EnemyPoint(&mut ep), "Link", FieldValue::Int(-1)).unwrap();
        assert!(ep.link.is_none());

        assert!(matches!(
            write_field(EntityMut::EnemyPoint(&mut ep), "Link", FieldValue::Int(-5)),
            Err(PitlaneError::ValueOutOfRange { min: -1, .. })
        ));
        assert!(ep.link.is_none());
    }

    #[test]
    fn test_object_type_label_and_invalid_choice() {
        let names = names();
        let mut obj = MapObject::new(Vec3::ZERO, 9999);

        let rows = read_fields(EntityRef::MapObject(&obj), &names).unwrap();
        let label = rows.iter().find(|(l, _)| *l == "Object Type").unwrap();
        assert_eq!(label.1, "INVALID");

        // choosing INVALID keeps the unknown code
        let invalid = FieldValue::parse(FieldKind::ObjectType, "INVALID", &names).unwrap();
        write_field(EntityMut::MapObject(&mut obj), "Object Type", invalid).unwrap();
        assert_eq!(obj.object_id, 9999);

        let cannon = FieldValue::parse(FieldKind::ObjectType, "GeoCannon", &names).unwrap();
        write_field(EntityMut::MapObject(&mut obj), "Object Type", cannon).unwrap();
        assert_eq!(obj.object_id, 7);
    }

    #[test]
    fn test_group_rows_show_sentinels() {
        let group = CheckpointGroup::default();
        let rows = read_fields(EntityRef::CheckpointGroup(&group), &names()).unwrap();
        assert_eq!(rows.len(), 9);
        assert!(rows[1..].iter().all(|(_, v)| v == "-1"));
    }

    #[test]
    fn test_parse_values() {
        let names = names();
        assert_eq!(
            FieldValue::parse(FieldKind::Vec3, "1, 2.5, -3", &names).unwrap(),
            FieldValue::Vec3(Vec3::new(1.0, 2.5, -3.0))
        );
        assert!(FieldValue::parse(FieldKind::Vec3, "1, 2", &names).is_err());
        assert!(FieldValue::parse(FieldKind::Int { min: 0, max: 1 }, "x", &names).is_err());
        assert!(FieldValue::parse(FieldKind::ObjectType, "Nope", &names).is_err());
    }

    #[test]
    fn test_position_display_rounds() {
        let ep = EnemyPoint::new(Vec3::new(1.23456, 0.0, -2.0), 0);
        let rows = read_fields(EntityRef::EnemyPoint(&ep), &names()).unwrap();
        assert_eq!(rows[0].1, "1.235, 0, -2");
    }
}

use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;
use std::collections::HashMap;

use super::{BufBinding, TagBinding, get_from, put, read_from, write};
use crate::buf::ByteBuf;
use crate::context::SerialContext;
use crate::impls::ByteArray;
use crate::info::{
    Descriptor, DescriptorCell, EnumInfo, NamedField, PolymorphicInfo, StructInfo, Subclass,
};
use crate::tag::{Tag, TagCompound};
use crate::value::{StructValue, Value};
use crate::{Serial, SerialError};

// -----------------------------------------------------------------------------
// Fixtures

#[derive(Debug, Clone, PartialEq)]
struct Point {
    x: i32,
    y: i32,
}

impl Serial for Point {
    fn descriptor() -> Descriptor {
        static CELL: DescriptorCell = DescriptorCell::new();
        CELL.get_or_init(|| {
            Descriptor::new(StructInfo::new(
                "Point",
                [
                    NamedField::new("x", i32::descriptor()),
                    NamedField::new("y", i32::descriptor()),
                ],
            ))
        })
        .clone()
    }

    fn to_value(&self) -> Value {
        StructValue::new("Point", vec![self.x.to_value(), self.y.to_value()]).into()
    }

    fn from_value(value: Value) -> Result<Self, SerialError> {
        let mut fields = value.into_struct("Point")?.into_fields();
        Ok(Point {
            x: fields.next_field()?,
            y: fields.next_field()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Side {
    Left,
    Right,
}

impl Serial for Side {
    fn descriptor() -> Descriptor {
        static CELL: DescriptorCell = DescriptorCell::new();
        CELL.get_or_init(|| Descriptor::new(EnumInfo::new("Side", ["Left", "Right"])))
            .clone()
    }

    fn to_value(&self) -> Value {
        Value::Enum(*self as u32)
    }

    fn from_value(value: Value) -> Result<Self, SerialError> {
        match value {
            Value::Enum(0) => Ok(Side::Left),
            Value::Enum(1) => Ok(Side::Right),
            other => Err(SerialError::mismatch(format!("not a Side: {other:?}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Player {
    name: String,
    nick: Option<String>,
    level: i32,
    alive: bool,
    flags: i8,
    kills: i16,
    seen: i64,
    speed: f32,
    xp: f64,
    side: Side,
    pos: Point,
    inventory: Vec<Option<String>>,
    scores: BTreeMap<String, i64>,
    avatar: ByteArray,
}

impl Serial for Player {
    fn descriptor() -> Descriptor {
        static CELL: DescriptorCell = DescriptorCell::new();
        CELL.get_or_init(|| {
            Descriptor::new(StructInfo::new(
                "Player",
                [
                    NamedField::new("name", String::descriptor()),
                    NamedField::new("nick", <Option<String>>::descriptor()),
                    NamedField::new("level", i32::descriptor()),
                    NamedField::new("alive", bool::descriptor()),
                    NamedField::new("flags", i8::descriptor()),
                    NamedField::new("kills", i16::descriptor()),
                    NamedField::new("seen", i64::descriptor()),
                    NamedField::new("speed", f32::descriptor()),
                    NamedField::new("xp", f64::descriptor()),
                    NamedField::new("side", Side::descriptor()),
                    NamedField::new("pos", Point::descriptor()),
                    NamedField::new("inventory", <Vec<Option<String>>>::descriptor()),
                    NamedField::new("scores", <BTreeMap<String, i64>>::descriptor()),
                    NamedField::new("avatar", ByteArray::descriptor()),
                ],
            ))
        })
        .clone()
    }

    fn to_value(&self) -> Value {
        StructValue::new(
            "Player",
            vec![
                self.name.to_value(),
                self.nick.to_value(),
                self.level.to_value(),
                self.alive.to_value(),
                self.flags.to_value(),
                self.kills.to_value(),
                self.seen.to_value(),
                self.speed.to_value(),
                self.xp.to_value(),
                self.side.to_value(),
                self.pos.to_value(),
                self.inventory.to_value(),
                self.scores.to_value(),
                self.avatar.to_value(),
            ],
        )
        .into()
    }

    fn from_value(value: Value) -> Result<Self, SerialError> {
        let mut fields = value.into_struct("Player")?.into_fields();
        Ok(Player {
            name: fields.next_field()?,
            nick: fields.next_field()?,
            level: fields.next_field()?,
            alive: fields.next_field()?,
            flags: fields.next_field()?,
            kills: fields.next_field()?,
            seen: fields.next_field()?,
            speed: fields.next_field()?,
            xp: fields.next_field()?,
            side: fields.next_field()?,
            pos: fields.next_field()?,
            inventory: fields.next_field()?,
            scores: fields.next_field()?,
            avatar: fields.next_field()?,
        })
    }
}

fn player(name: &str, nick: Option<&str>) -> Player {
    Player {
        name: name.to_string(),
        nick: nick.map(ToString::to_string),
        level: 12,
        alive: true,
        flags: -3,
        kills: 300,
        seen: 1_700_000_000_000,
        speed: 0.25,
        xp: 1234.5,
        side: Side::Right,
        pos: Point { x: -4, y: 64 },
        inventory: vec![Some("sword".to_string()), None, Some("apple".to_string())],
        scores: [("dig".to_string(), 10), ("fish".to_string(), -1)].into_iter().collect(),
        avatar: ByteArray(vec![0x89, b'P', b'N', b'G']),
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Circle {
    radius: f64,
}

impl Serial for Circle {
    fn descriptor() -> Descriptor {
        static CELL: DescriptorCell = DescriptorCell::new();
        CELL.get_or_init(|| {
            Descriptor::new(StructInfo::new(
                "Circle",
                [NamedField::new("radius", f64::descriptor())],
            ))
        })
        .clone()
    }

    fn to_value(&self) -> Value {
        StructValue::new("Circle", vec![self.radius.to_value()]).into()
    }

    fn from_value(value: Value) -> Result<Self, SerialError> {
        let mut fields = value.into_struct("Circle")?.into_fields();
        Ok(Circle {
            radius: fields.next_field()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Square {
    side: i32,
}

impl Serial for Square {
    fn descriptor() -> Descriptor {
        static CELL: DescriptorCell = DescriptorCell::new();
        CELL.get_or_init(|| {
            Descriptor::new(StructInfo::new(
                "Square",
                [NamedField::new("side", i32::descriptor())],
            ))
        })
        .clone()
    }

    fn to_value(&self) -> Value {
        StructValue::new("Square", vec![self.side.to_value()]).into()
    }

    fn from_value(value: Value) -> Result<Self, SerialError> {
        let mut fields = value.into_struct("Square")?.into_fields();
        Ok(Square {
            side: fields.next_field()?,
        })
    }
}

/// An open polymorphic base, resolved through the context.
#[derive(Debug, Clone, PartialEq)]
enum Shape {
    Circle(Circle),
    Square(Square),
}

impl Shape {
    fn value_of(value: Value) -> Result<Self, SerialError> {
        match value.runtime_type() {
            Some("Circle") => Circle::from_value(value).map(Shape::Circle),
            Some("Square") => Square::from_value(value).map(Shape::Square),
            _ => Err(SerialError::mismatch("not a Shape")),
        }
    }
}

impl Serial for Shape {
    fn descriptor() -> Descriptor {
        static CELL: DescriptorCell = DescriptorCell::new();
        CELL.get_or_init(|| Descriptor::new(PolymorphicInfo::open("Shape")))
            .clone()
    }

    fn to_value(&self) -> Value {
        match self {
            Shape::Circle(c) => c.to_value(),
            Shape::Square(s) => s.to_value(),
        }
    }

    fn from_value(value: Value) -> Result<Self, SerialError> {
        Shape::value_of(value)
    }
}

/// The same shapes as a sealed base, resolved without any context.
#[derive(Debug, Clone, PartialEq)]
struct SealedShape(Shape);

impl Serial for SealedShape {
    fn descriptor() -> Descriptor {
        static CELL: DescriptorCell = DescriptorCell::new();
        CELL.get_or_init(|| {
            Descriptor::new(PolymorphicInfo::sealed(
                "SealedShape",
                [
                    Subclass::with_tag("circle", Circle::descriptor()),
                    Subclass::new(Square::descriptor()),
                ],
            ))
        })
        .clone()
    }

    fn to_value(&self) -> Value {
        self.0.to_value()
    }

    fn from_value(value: Value) -> Result<Self, SerialError> {
        Shape::value_of(value).map(SealedShape)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Drawing {
    title: String,
    shapes: Vec<Shape>,
}

impl Serial for Drawing {
    fn descriptor() -> Descriptor {
        static CELL: DescriptorCell = DescriptorCell::new();
        CELL.get_or_init(|| {
            Descriptor::new(StructInfo::new(
                "Drawing",
                [
                    NamedField::new("title", String::descriptor()),
                    NamedField::new("shapes", <Vec<Shape>>::descriptor()),
                ],
            ))
        })
        .clone()
    }

    fn to_value(&self) -> Value {
        StructValue::new("Drawing", vec![self.title.to_value(), self.shapes.to_value()]).into()
    }

    fn from_value(value: Value) -> Result<Self, SerialError> {
        let mut fields = value.into_struct("Drawing")?.into_fields();
        Ok(Drawing {
            title: fields.next_field()?,
            shapes: fields.next_field()?,
        })
    }
}

fn drawing() -> Drawing {
    Drawing {
        title: "logo".to_string(),
        shapes: vec![
            Shape::Circle(Circle { radius: 1.5 }),
            Shape::Square(Square { side: 4 }),
        ],
    }
}

fn shape_context() -> SerialContext {
    let mut context = SerialContext::empty();
    assert!(context.register_type::<Shape, Circle>());
    assert!(context.register_type::<Shape, Square>());
    context
}

fn tree_round_trip<T: Serial + PartialEq + core::fmt::Debug>(value: &T) {
    let mut compound = TagCompound::new();
    put(value, &mut compound).unwrap();
    assert_eq!(&get_from::<T>(&compound).unwrap(), value);
}

fn stream_round_trip<T: Serial + PartialEq + core::fmt::Debug>(value: &T) {
    let mut buf = ByteBuf::new();
    write(value, &mut buf).unwrap();
    assert_eq!(&read_from::<T>(&mut buf).unwrap(), value);
    assert_eq!(buf.readable_bytes(), 0);
}

fn round_trip_both<T: Serial + PartialEq + core::fmt::Debug>(value: T) {
    tree_round_trip(&value);
    stream_round_trip(&value);
}

// -----------------------------------------------------------------------------
// Round trips

#[test]
fn round_trip_primitives() {
    round_trip_both(true);
    round_trip_both(i8::MIN);
    round_trip_both(i16::MAX);
    round_trip_both(-123_456_i32);
    round_trip_both(i64::MIN);
    round_trip_both(f32::MIN_POSITIVE);
    round_trip_both(-0.1_f64);
    round_trip_both(String::from("héllo wörld"));
    round_trip_both(String::new());
    round_trip_both(ByteArray(vec![0, 255, 7]));
}

#[test]
fn round_trip_nullable_primitives() {
    round_trip_both(Some(5_i32));
    round_trip_both(Some(String::from("x")));
}

#[test]
fn round_trip_structures() {
    round_trip_both(Point { x: 1, y: -2 });
    round_trip_both(player("steve", Some("st")));
    round_trip_both(player("alex", None));
    round_trip_both(Some(Point { x: 0, y: 0 }));
}

#[test]
fn round_trip_lists_and_maps() {
    round_trip_both(Vec::<i32>::new());
    round_trip_both(vec![vec![1_i64], vec![], vec![2, 3]]);
    round_trip_both(vec![Some(Point { x: 1, y: 1 }), None]);

    let mut by_name = BTreeMap::new();
    by_name.insert("a".to_string(), Point { x: 1, y: 2 });
    by_name.insert("b".to_string(), Point { x: 3, y: 4 });
    round_trip_both(by_name);

    let mut by_id: HashMap<i32, Option<String>> = HashMap::new();
    by_id.insert(1, Some("one".to_string()));
    by_id.insert(2, None);
    round_trip_both(by_id);
}

#[test]
fn round_trip_nested_nullable() {
    round_trip_both(None::<Option<i32>>);
    round_trip_both(Some(None::<i32>));
    round_trip_both(Some(Some(3_i32)));
    round_trip_both(vec![Some(None), None, Some(Some(Point { x: 1, y: 2 }))]);

    let mut buf = ByteBuf::new();
    write(&Some(None::<i32>), &mut buf).unwrap();
    write(&None::<Option<i32>>, &mut buf).unwrap();
    assert_eq!(buf.as_slice(), &[1, 0, 0]);

    let mut compound = TagCompound::new();
    put(&Some(None::<i32>), &mut compound).unwrap();
    let present: TagCompound = [("some", Tag::End)].into_iter().collect();
    assert_eq!(compound.get("Option<i32>"), Some(&Tag::Compound(present)));
}

#[test]
fn round_trip_enums() {
    round_trip_both(Side::Left);
    round_trip_both(vec![Side::Right, Side::Left]);
    round_trip_both(Some(Side::Right));
}

#[test]
fn round_trip_polymorphic() {
    let context = shape_context();

    let mut compound = TagCompound::new();
    let binding = TagBinding::new().with_context(&context);
    binding.put(&drawing(), &mut compound).unwrap();
    assert_eq!(binding.get_from::<Drawing>(&compound).unwrap(), drawing());

    let mut buf = ByteBuf::new();
    let binding = BufBinding::new().with_context(&context);
    binding.write(&drawing(), &mut buf).unwrap();
    assert_eq!(binding.read_from::<Drawing>(&mut buf).unwrap(), drawing());
}

// -----------------------------------------------------------------------------
// Layouts

#[test]
fn tree_layout() {
    let mut compound = TagCompound::new();
    put(&Point { x: 1, y: 2 }, &mut compound).unwrap();
    put(&Side::Right, &mut compound).unwrap();
    put(&true, &mut compound).unwrap();

    let point: TagCompound = [("x", Tag::Int(1)), ("y", Tag::Int(2))].into_iter().collect();
    assert_eq!(compound.get("Point"), Some(&Tag::Compound(point)));
    assert_eq!(compound.get("Side"), Some(&Tag::String("Right".to_string())));
    assert_eq!(compound.get("bool"), Some(&Tag::Byte(1)));
}

#[test]
fn tree_layout_of_polymorphic_and_map() {
    let context = shape_context();
    let mut compound = TagCompound::new();
    TagBinding::new()
        .with_context(&context)
        .put(&Shape::Square(Square { side: 2 }), &mut compound)
        .unwrap();

    let payload: TagCompound = [("side", Tag::Int(2))].into_iter().collect();
    let expected: TagCompound = [
        ("type", Tag::String("Square".to_string())),
        ("value", Tag::Compound(payload)),
    ]
    .into_iter()
    .collect();
    assert_eq!(compound.get("Shape"), Some(&Tag::Compound(expected)));

    let mut map = BTreeMap::new();
    map.insert(7_i32, 8_i32);
    put(&map, &mut compound).unwrap();
    let entry: TagCompound = [("key", Tag::Int(7)), ("value", Tag::Int(8))].into_iter().collect();
    assert_eq!(
        compound.get("Map<i32, i32>"),
        Some(&Tag::List(vec![Tag::Compound(entry)]))
    );
}

#[test]
fn stream_layout() {
    let mut buf = ByteBuf::new();
    write(&Point { x: 1, y: 2 }, &mut buf).unwrap();
    assert_eq!(buf.as_slice(), &[1, 0, 0, 0, 1, 0, 0, 0, 2]);

    let mut buf = ByteBuf::new();
    write(&vec![Some(Side::Right), None], &mut buf).unwrap();
    assert_eq!(buf.as_slice(), &[1, 2, 1, 1, 0]);

    let context = shape_context();
    let mut buf = ByteBuf::new();
    BufBinding::new()
        .with_context(&context)
        .write(&Shape::Square(Square { side: 2 }), &mut buf)
        .unwrap();
    assert_eq!(buf.as_slice(), b"\x01\x06Square\x00\x00\x00\x02");
}

// -----------------------------------------------------------------------------
// Slots

#[test]
fn duplicate_default_key_is_rejected() {
    let mut compound = TagCompound::new();
    put(&Point { x: 1, y: 1 }, &mut compound).unwrap();

    let err = put(&Point { x: 2, y: 2 }, &mut compound).unwrap_err();
    assert_eq!(
        err,
        SerialError::DuplicateSlot {
            key: "Point".to_string(),
            name: "Point".to_string()
        }
    );
    assert!(err.to_string().contains("must specify a key"));
    // The first value is kept.
    assert_eq!(get_from::<Point>(&compound).unwrap(), Point { x: 1, y: 1 });
}

#[test]
fn distinct_explicit_keys_for_the_same_type() {
    let mut compound = TagCompound::new();
    TagBinding::new().with_key("from").put(&Point { x: 0, y: 0 }, &mut compound).unwrap();
    TagBinding::new().with_key("to").put(&Point { x: 9, y: 9 }, &mut compound).unwrap();

    assert_eq!(compound.len(), 2);
    let to: Point = TagBinding::new().with_key("to").get_from(&compound).unwrap();
    assert_eq!(to, Point { x: 9, y: 9 });

    // A null value is still checked against an occupied key.
    let err = TagBinding::new()
        .with_key("to")
        .put(&None::<Point>, &mut compound)
        .unwrap_err();
    assert!(matches!(err, SerialError::DuplicateSlot { .. }));
}

#[test]
fn repeated_names_fail_to_encode_into_tree() {
    let dup = Descriptor::new(StructInfo::new(
        "Dup",
        [
            NamedField::new("a", i32::descriptor()),
            NamedField::new("a", String::descriptor()),
        ],
    ));
    let value: Value = StructValue::new("Dup", vec![Value::Int(1), Value::from("s")]).into();

    let mut compound = TagCompound::new();
    let err = TagBinding::new().put_value(&dup, &value, &mut compound).unwrap_err();
    assert!(err.is_structural());
    assert!(compound.is_empty());

    // The stream is positional, names do not matter there.
    let mut buf = ByteBuf::new();
    BufBinding::new().write_value(&dup, &value, &mut buf).unwrap();
    assert_eq!(BufBinding::new().read_value(&dup, &mut buf).unwrap(), value);

    let twin = Descriptor::new(EnumInfo::new("Twin", ["A", "A"]));
    let err = TagBinding::new()
        .put_value(&twin, &Value::Enum(1), &mut compound)
        .unwrap_err();
    assert!(err.is_structural());
    assert!(compound.is_empty());
}

// -----------------------------------------------------------------------------
// Nullability

#[test]
fn null_round_trip_tree() {
    let mut compound = TagCompound::new();
    put(&None::<Point>, &mut compound).unwrap();

    assert!(compound.is_empty());
    assert_eq!(get_from::<Option<Point>>(&compound).unwrap(), None);
}

#[test]
fn null_round_trip_stream() {
    let mut buf = ByteBuf::new();
    write(&None::<Point>, &mut buf).unwrap();
    assert_eq!(buf.as_slice(), &[0]);
    assert_eq!(read_from::<Option<Point>>(&mut buf).unwrap(), None);
}

#[test]
fn null_through_non_nullable_descriptor() {
    let name = || SerialError::NonNullable {
        name: "Point".to_string(),
    };

    let mut buf = ByteBuf::new();
    let err = BufBinding::new()
        .write_value(&Point::descriptor(), &Value::Null, &mut buf)
        .unwrap_err();
    assert_eq!(err, name());
    assert_eq!(buf.writer_index(), 0);

    let mut compound = TagCompound::new();
    let err = TagBinding::new()
        .put_value(&Point::descriptor(), &Value::Null, &mut compound)
        .unwrap_err();
    assert_eq!(err, name());
    assert!(compound.is_empty());
}

#[test]
fn absent_key_with_nullable_descriptor() {
    let compound = TagCompound::new();
    assert_eq!(get_from::<Option<Point>>(&compound).unwrap(), None);
    assert_eq!(get_from::<Option<i32>>(&compound).unwrap(), None);
}

#[test]
fn absent_key_with_non_nullable_descriptor() {
    let compound = TagCompound::new();

    // The empty compound cannot provide required fields.
    assert!(get_from::<Point>(&compound).unwrap_err().is_structural());
    assert!(get_from::<i32>(&compound).unwrap_err().is_structural());

    // It can provide a structure of nullable fields.
    let settings = Descriptor::new(StructInfo::new(
        "Settings",
        [
            NamedField::new("volume", i32::descriptor().nullable()),
            NamedField::new("motd", String::descriptor().nullable()),
        ],
    ));
    assert_eq!(
        TagBinding::new().get_value(&settings, &compound).unwrap(),
        StructValue::new("Settings", vec![Value::Null, Value::Null]).into()
    );
}

#[test]
fn null_write_and_absent_read_are_asymmetric() {
    // Writing a null through the nullable form leaves no entry...
    let mut compound = TagCompound::new();
    put(&None::<Point>, &mut compound).unwrap();

    // ...which the non-nullable form does not read as a null.
    assert!(get_from::<Point>(&compound).unwrap_err().is_structural());

    // The stream keeps the mark and fails with the nullability error instead.
    let mut buf = ByteBuf::new();
    write(&None::<Point>, &mut buf).unwrap();
    assert_eq!(
        read_from::<Point>(&mut buf),
        Err(SerialError::NonNullable {
            name: "Point".to_string()
        })
    );
}

// -----------------------------------------------------------------------------
// Stream failures

#[test]
fn invalid_mark_and_truncated_stream() {
    let mut buf = ByteBuf::wrap(vec![2]);
    assert!(read_from::<i32>(&mut buf).unwrap_err().is_structural());

    let mut buf = ByteBuf::wrap(vec![1, 0, 0]);
    assert_eq!(
        read_from::<i32>(&mut buf),
        Err(SerialError::EndOfStream {
            needed: 4,
            remaining: 2
        })
    );
}

#[test]
fn positional_desync() {
    let mut buf = ByteBuf::new();
    write(&Point { x: 1, y: 2 }, &mut buf).unwrap();

    // Read with the wrong descriptor: the stream cannot tell.
    let mut copy = buf.clone();
    assert_eq!(read_from::<i64>(&mut copy).unwrap(), 0x0000_0001_0000_0002);

    let pair = Descriptor::new(StructInfo::new(
        "Pair",
        [
            NamedField::new("a", i64::descriptor()),
            NamedField::new("b", i64::descriptor()),
        ],
    ));
    let err = BufBinding::new().read_value(&pair, &mut buf).unwrap_err();
    assert!(err.is_structural());
}

#[test]
fn garbage_count_exceeding_input() {
    // Mark, then a count of `i32::MAX` with no elements behind it.
    let mut buf = ByteBuf::wrap(vec![1, 0xFF, 0xFF, 0xFF, 0xFF, 0x07]);
    assert_eq!(
        read_from::<Vec<Point>>(&mut buf),
        Err(SerialError::EndOfStream {
            needed: i32::MAX as usize,
            remaining: 0
        })
    );

    let mut buf = ByteBuf::wrap(vec![1, 0x03, 0, 0]);
    assert!(read_from::<BTreeMap<i32, i32>>(&mut buf).unwrap_err().is_structural());
}

// -----------------------------------------------------------------------------
// Polymorphism

#[test]
fn unregistered_polymorphic_type() {
    let mut compound = TagCompound::new();
    let err = put(&drawing(), &mut compound).unwrap_err();
    assert_eq!(
        err,
        SerialError::UnregisteredType {
            base: "Shape".to_string(),
            type_name: "Circle".to_string()
        }
    );
    assert!(compound.is_empty());

    let mut context = SerialContext::empty();
    context.register_type::<Shape, Circle>();
    let err = TagBinding::new()
        .with_context(&context)
        .put(&drawing(), &mut compound)
        .unwrap_err();
    assert!(err.is_unregistered());
}

#[test]
fn unregistered_polymorphic_tag() {
    let context = shape_context();
    let mut buf = ByteBuf::new();
    BufBinding::new()
        .with_context(&context)
        .write(&drawing(), &mut buf)
        .unwrap();

    assert_eq!(
        read_from::<Drawing>(&mut buf),
        Err(SerialError::UnregisteredTag {
            base: "Shape".to_string(),
            tag: "Circle".to_string()
        })
    );
}

#[test]
fn explicit_tags() {
    let mut context = SerialContext::empty();
    context.register_with_tag("Shape", "c", Circle::descriptor());

    let circle = Shape::Circle(Circle { radius: 2.0 });
    let mut compound = TagCompound::new();
    let binding = TagBinding::new().with_context(&context);
    binding.put(&circle, &mut compound).unwrap();

    let stored = compound.get("Shape").and_then(Tag::as_compound).unwrap();
    assert_eq!(stored.get("type"), Some(&Tag::String("c".to_string())));
    assert_eq!(binding.get_from::<Shape>(&compound).unwrap(), circle);
}

#[test]
fn sealed_subclasses_need_no_context() {
    let circle = SealedShape(Shape::Circle(Circle { radius: 0.5 }));
    let square = SealedShape(Shape::Square(Square { side: 3 }));
    round_trip_both(circle.clone());
    round_trip_both(square);

    let mut compound = TagCompound::new();
    put(&circle, &mut compound).unwrap();
    let stored = compound.get("SealedShape").and_then(Tag::as_compound).unwrap();
    assert_eq!(stored.get("type"), Some(&Tag::String("circle".to_string())));
}

// -----------------------------------------------------------------------------
// Sharing

#[test]
fn descriptors_and_context_shared_across_threads() {
    let context = shape_context();
    let descriptor = Drawing::descriptor();

    std::thread::scope(|s| {
        for i in 0..4 {
            let context = &context;
            let descriptor = &descriptor;
            s.spawn(move || {
                let value = Drawing {
                    title: format!("drawing {i}"),
                    shapes: vec![Shape::Square(Square { side: i })],
                }
                .to_value();

                let mut buf = ByteBuf::new();
                let binding = BufBinding::new().with_context(context);
                binding.write_value(descriptor, &value, &mut buf).unwrap();
                assert_eq!(binding.read_value(descriptor, &mut buf).unwrap(), value);

                let mut compound = TagCompound::new();
                let binding = TagBinding::new().with_context(context);
                binding.put_value(descriptor, &value, &mut compound).unwrap();
                assert_eq!(binding.get_value(descriptor, &compound).unwrap(), value);
            });
        }
    });
}

// -----------------------------------------------------------------------------
// auto_register

#[cfg(feature = "auto_register")]
crate::submit_polymorphic!(Shape => Square as "square");

#[cfg(feature = "auto_register")]
#[test]
fn auto_register_collects_submissions() {
    let mut context = SerialContext::empty();
    assert!(context.auto_register());
    assert_eq!(context.tag_of("Shape", "Square"), Some("square"));

    // Repeated calls keep the registry unchanged.
    assert!(context.auto_register());
    round_trip_with(&context, Shape::Square(Square { side: 5 }));
}

#[cfg(feature = "auto_register")]
fn round_trip_with(context: &SerialContext, shape: Shape) {
    let mut buf = ByteBuf::new();
    let binding = BufBinding::new().with_context(context);
    binding.write(&shape, &mut buf).unwrap();
    assert_eq!(binding.read_from::<Shape>(&mut buf).unwrap(), shape);
}

#[cfg(not(feature = "auto_register"))]
#[test]
fn auto_register_is_unavailable() {
    assert!(!SerialContext::empty().auto_register());
}

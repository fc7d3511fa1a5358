//! XDR is a standard for the description and encoding of data.
//! It is useful for transferring data between different computer
//! architectures, and it is the wire representation of every ONC RPC
//! message header and argument.
//!
//! <https://datatracker.ietf.org/doc/html/rfc4506>
//!
//! The RPC engine delegates all argument and result encoding to this
//! module. Where appropriate, the standard types of the XDR language have
//! been replaced by similar Rust types: `int` is `i32`, `unsigned hyper`
//! is `u64`, `opaque<>` is `[u8]` / `Vec<u8>` and `string<>` is
//! `str` / `String`.
//!
//! Every item occupies a multiple of four bytes on the wire and all
//! integers are big endian.

use std::io::{Read, Write};

use byteorder::BigEndian;
use byteorder::{ReadBytesExt, WriteBytesExt};
use num_traits::{FromPrimitive, ToPrimitive};

pub mod rpc;
mod utils;

pub use utils::ALIGNMENT;

/// XDR assumes big endian encoding.
pub type XDREndian = BigEndian;

pub trait Serialize {
    /// Serializes the implementing type to the provided writer.
    ///
    /// ## Parameters
    /// * `dest` - Where will the value be serialized to.
    ///
    /// ## Returns
    /// * `std::io::Result<()>` - Ok(()) on success, or an error if serialization fails.
    fn serialize<W: Write>(&self, dest: &mut W) -> std::io::Result<()>;
}

pub trait Deserialize {
    /// Deserializes data from the provided reader into the implementing type.
    ///
    /// ## Parameters
    /// * `src` - From where the value will be deserialized.
    ///
    /// ## Returns
    /// * `std::io::Result<()>` - Ok(()) on success, or an error if deserialization fails.
    fn deserialize<R: Read>(&mut self, src: &mut R) -> std::io::Result<()>;
}

/// Deserialization based on the [Default] trait of the type T.
pub fn deserialize<T>(src: &mut impl Read) -> std::io::Result<T>
where
    T: Deserialize + Default,
{
    let mut val = T::default();
    val.deserialize(src)?;

    Ok(val)
}

/// Enumerations have the same representation as signed integers.
pub fn serialize_enum<T: ToPrimitive>(val: &T, dest: &mut impl Write) -> std::io::Result<()> {
    match val.to_i32() {
        Some(val) => dest.write_i32::<XDREndian>(val),
        None => Err(utils::invalid_data("Invalid enum value")),
    }
}

/// Reads a signed integer and maps it onto the enumeration `T`.
pub fn deserialize_enum<T: FromPrimitive>(src: &mut impl Read) -> std::io::Result<T> {
    let val = src.read_i32::<XDREndian>()?;
    T::from_i32(val).ok_or_else(|| utils::invalid_data("Invalid enum value"))
}

/// XDR `bool` is `enum { FALSE = 0, TRUE = 1 }`, so it travels as an `i32`.
impl Serialize for bool {
    fn serialize<W: Write>(&self, dest: &mut W) -> std::io::Result<()> {
        dest.write_i32::<XDREndian>(i32::from(*self))
    }
}

impl Deserialize for bool {
    fn deserialize<R: Read>(&mut self, src: &mut R) -> std::io::Result<()> {
        *self = match src.read_i32::<XDREndian>()? {
            0 => false,
            1 => true,
            _ => return Err(utils::invalid_data("Invalid value for bool enum")),
        };
        Ok(())
    }
}

macro_rules! xdr_integer {
    ($t:ty, $write:ident, $read:ident) => {
        impl Serialize for $t {
            fn serialize<W: Write>(&self, dest: &mut W) -> std::io::Result<()> {
                dest.$write::<XDREndian>(*self)
            }
        }

        impl Deserialize for $t {
            fn deserialize<R: Read>(&mut self, src: &mut R) -> std::io::Result<()> {
                *self = src.$read::<XDREndian>()?;
                Ok(())
            }
        }
    };
}

// int, unsigned int, hyper, unsigned hyper
xdr_integer!(i32, write_i32, read_i32);
xdr_integer!(u32, write_u32, read_u32);
xdr_integer!(i64, write_i64, read_i64);
xdr_integer!(u64, write_u64, read_u64);

/// XDR Fixed-Length Opaque Data.
///
/// ```text
/// opaque identifier[n];
/// ```
impl<const N: usize> Serialize for [u8; N] {
    fn serialize<W: Write>(&self, dest: &mut W) -> std::io::Result<()> {
        dest.write_all(self)?;
        utils::write_padding(N, dest)
    }
}

impl<const N: usize> Deserialize for [u8; N] {
    fn deserialize<R: Read>(&mut self, src: &mut R) -> std::io::Result<()> {
        src.read_exact(self)?;
        utils::read_padding(N, src)
    }
}

/// Object lengths in XDR are always serialized as [u32].
fn length_prefix(len: usize) -> std::io::Result<u32> {
    len.to_u32().ok_or_else(|| utils::invalid_data("cannot cast `usize` to `u32`"))
}

/// XDR Variable-Length Opaque Data.
///
/// ```text
/// opaque identifier<m>;
/// ```
///
/// A four byte length, the bytes themselves, then zero padding to the next
/// four byte boundary.
impl Serialize for [u8] {
    fn serialize<W: Write>(&self, dest: &mut W) -> std::io::Result<()> {
        length_prefix(self.len())?.serialize(dest)?;
        dest.write_all(self)?;
        utils::write_padding(self.len(), dest)
    }
}

impl Serialize for Vec<u8> {
    fn serialize<W: Write>(&self, dest: &mut W) -> std::io::Result<()> {
        self.as_slice().serialize(dest)
    }
}

impl Deserialize for Vec<u8> {
    fn deserialize<R: Read>(&mut self, src: &mut R) -> std::io::Result<()> {
        let Some(length) = deserialize::<u32>(src)?.to_usize() else {
            return Err(utils::invalid_data("cannot cast `u32` to `usize`"));
        };

        self.clear();
        // Grows with the data actually present instead of trusting the prefix.
        let read = src.by_ref().take(length as u64).read_to_end(self)?;
        if read != length {
            return Err(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                format!("opaque data truncated: {read} of {length} bytes"),
            ));
        }
        utils::read_padding(length, src)
    }
}

/// XDR String, an opaque byte sequence restricted to ASCII.
impl Serialize for str {
    fn serialize<W: Write>(&self, dest: &mut W) -> std::io::Result<()> {
        self.as_bytes().serialize(dest)
    }
}

impl Serialize for String {
    fn serialize<W: Write>(&self, dest: &mut W) -> std::io::Result<()> {
        self.as_str().serialize(dest)
    }
}

impl Deserialize for String {
    fn deserialize<R: Read>(&mut self, src: &mut R) -> std::io::Result<()> {
        let bytes = deserialize::<Vec<u8>>(src)?;
        if !bytes.is_ascii() {
            return Err(utils::invalid_data("Not ASCII string"));
        }
        *self = String::from_utf8(bytes).map_err(|_| utils::invalid_data("Not ASCII string"))?;
        Ok(())
    }
}

/// XDR Optional-Data: a `bool` discriminant followed by the value when present.
impl<T: Serialize> Serialize for Option<T> {
    fn serialize<W: Write>(&self, dest: &mut W) -> std::io::Result<()> {
        match self {
            Some(data) => {
                true.serialize(dest)?;
                data.serialize(dest)
            }
            None => false.serialize(dest),
        }
    }
}

impl<T: Deserialize + Default> Deserialize for Option<T> {
    fn deserialize<R: Read>(&mut self, src: &mut R) -> std::io::Result<()> {
        *self = if deserialize::<bool>(src)? { Some(deserialize::<T>(src)?) } else { None };
        Ok(())
    }
}

impl<T: Serialize + ?Sized> Serialize for &T {
    fn serialize<W: Write>(&self, dest: &mut W) -> std::io::Result<()> {
        (**self).serialize(dest)
    }
}

/// XDR `void`, an empty argument list.
impl Serialize for () {
    fn serialize<W: Write>(&self, _dest: &mut W) -> std::io::Result<()> {
        Ok(())
    }
}

impl Deserialize for () {
    fn deserialize<R: Read>(&mut self, _src: &mut R) -> std::io::Result<()> {
        Ok(())
    }
}

// A tuple is an ordered argument list: every element is encoded in turn.
macro_rules! xdr_tuple {
    ($($name:ident),+) => {
        impl<$($name: Serialize),+> Serialize for ($($name,)+) {
            #[allow(non_snake_case)]
            fn serialize<W: Write>(&self, dest: &mut W) -> std::io::Result<()> {
                let ($($name,)+) = self;
                $($name.serialize(dest)?;)+
                Ok(())
            }
        }

        impl<$($name: Deserialize),+> Deserialize for ($($name,)+) {
            #[allow(non_snake_case)]
            fn deserialize<R: Read>(&mut self, src: &mut R) -> std::io::Result<()> {
                let ($($name,)+) = self;
                $($name.deserialize(src)?;)+
                Ok(())
            }
        }
    };
}

xdr_tuple!(A);
xdr_tuple!(A, B);
xdr_tuple!(A, B, C);
xdr_tuple!(A, B, C, D);
xdr_tuple!(A, B, C, D, E);
xdr_tuple!(A, B, C, D, E, F);

/// Macro for implementing XDR serialization for structs.
///
/// Serializes each listed field in sequence.
#[macro_export]
macro_rules! SerializeStruct {
    (
        $t:ident,
        $($element:ident),*
    ) => {
        impl $crate::protocol::xdr::Serialize for $t {
            fn serialize<W: std::io::Write>(&self, dest: &mut W) -> std::io::Result<()> {
                $($crate::protocol::xdr::Serialize::serialize(&self.$element, dest)?;)*
                Ok(())
            }
        }
    };
}

/// Macro for implementing XDR deserialization for structs.
#[macro_export]
macro_rules! DeserializeStruct {
    (
        $t:ident,
        $($element:ident),*
    ) => {
        impl $crate::protocol::xdr::Deserialize for $t {
            fn deserialize<R: std::io::Read>(&mut self, src: &mut R) -> std::io::Result<()> {
                $($crate::protocol::xdr::Deserialize::deserialize(&mut self.$element, src)?;)*
                Ok(())
            }
        }
    };
}

/// Implements XDR `enum` serialization for a type deriving `ToPrimitive`.
#[macro_export]
macro_rules! SerializeEnum {
    ($t:ident) => {
        impl $crate::protocol::xdr::Serialize for $t {
            fn serialize<W: std::io::Write>(&self, dest: &mut W) -> std::io::Result<()> {
                $crate::protocol::xdr::serialize_enum(self, dest)
            }
        }
    };
}

/// Implements XDR `enum` deserialization for a type deriving `FromPrimitive`.
#[macro_export]
macro_rules! DeserializeEnum {
    ($t:ident) => {
        impl $crate::protocol::xdr::Deserialize for $t {
            fn deserialize<R: std::io::Read>(&mut self, src: &mut R) -> std::io::Result<()> {
                *self = $crate::protocol::xdr::deserialize_enum(src)?;
                Ok(())
            }
        }
    };
}

pub use crate::DeserializeEnum;
pub use crate::DeserializeStruct;
pub use crate::SerializeEnum;
pub use crate::SerializeStruct;

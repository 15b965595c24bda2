pub trait WriteBytesLe {
    fn write_le(&self, dst: &mut Vec<u8>);
}

pub trait WriteBytesBe {
    fn write_be(&self, dst: &mut Vec<u8>);
}

macro_rules! impl_num_le_be {
    ($($t:ty),+) => { $(
        impl WriteBytesLe for $t { #[inline] fn write_le(&self, dst: &mut Vec<u8>) { dst.extend_from_slice(&self.to_le_bytes()); }}
        impl WriteBytesBe for $t { #[inline] fn write_be(&self, dst: &mut Vec<u8>) { dst.extend_from_slice(&self.to_be_bytes()); }}
    )+ }
}

impl_num_le_be!(u8, i8, u16, i16, u32, i32, f32);

#[macro_export]
macro_rules! impl_collection {
    ($trait:ident, $method:ident) => {
        impl<T: $trait> $trait for Vec<T> {
            #[inline]
            fn $method(&self, dst: &mut Vec<u8>) {
                self.iter().for_each(|item| item.$method(dst));
            }
        }
        impl<T: $trait, const N: usize> $trait for [T; N] {
            #[inline]
            fn $method(&self, dst: &mut Vec<u8>) {
                self.iter().for_each(|item| item.$method(dst));
            }
        }
    };
}

impl_collection!(WriteBytesLe, write_le);
impl_collection!(WriteBytesBe, write_be);

/// Concatenates the little-endian encodings of every argument.
#[macro_export]
macro_rules! join_bytes_le {
    ( $($value:expr),+ $(,)? ) => {{
        let mut vec = Vec::<u8>::new();
        $( $value.write_le(&mut vec); )+
        vec
    }};
}

/// Concatenates the big-endian encodings of every argument.
#[macro_export]
macro_rules! join_bytes_be {
    ( $($value:expr),+ $(,)? ) => {{
        let mut vec = Vec::<u8>::new();
        $( $value.write_be(&mut vec); )+
        vec
    }};
}

#[allow(unused_imports)]
pub use {join_bytes_be, join_bytes_le};

#[cfg(test)]
mod tests {
    use crate::utils::byteorder::{WriteBytesBe, WriteBytesLe};
    use owonscope_macros::ToBytes;

    #[derive(ToBytes)]
    struct Mini {
        a: u16,
        b: i32,
        tag: [u8; 3],
    }

    #[derive(ToBytes)]
    struct Pair(u8, f32);

    #[test]
    fn to_bytes_roundtrip() {
        let s = Mini {
            a: 0x1234,
            b: -2,
            tag: *b"CH1",
        };

        let vec_le = &mut Vec::new();
        let vec_be = &mut Vec::new();

        s.write_le(vec_le);
        s.write_be(vec_be);

        let expected_le = [0x34, 0x12, 0xFE, 0xFF, 0xFF, 0xFF, b'C', b'H', b'1'];
        let expected_be = [0x12, 0x34, 0xFF, 0xFF, 0xFF, 0xFE, b'C', b'H', b'1'];

        assert_eq!(&vec_le[..], &expected_le);
        assert_eq!(&vec_be[..], &expected_be);
    }

    #[test]
    fn tuple_struct_and_macros() {
        let vec = join_bytes_le!(Pair(7, 1.0), vec![0x0102u16]);
        assert_eq!(vec, [7, 0x00, 0x00, 0x80, 0x3F, 0x02, 0x01]);

        let vec = join_bytes_be!(0xFFFFu16, [0x0001u16; 2]);
        assert_eq!(vec, [0xFF, 0xFF, 0x00, 0x01, 0x00, 0x01]);
    }
}

/// Defines an operand struct `$name` whose fields are extracted from an `Opcode` with the
/// given accessors, and implements `From<Opcode>` for it. Every instruction group shares one
/// of these payload shapes, so decoding an instruction is just picking the shape.
macro_rules! define_operands {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$field_meta:meta])* $field:ident: $ty:ty = $accessor:ident),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name {
            $($(#[$field_meta])* pub $field: $ty,)+
        }

        impl From<Opcode> for $name {
            fn from(opcode: Opcode) -> Self {
                Self {
                    $($field: opcode.$accessor(),)+
                }
            }
        }
    };
}

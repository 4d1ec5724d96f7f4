/// The number of bytes for a scalar value over BLS12-381.
pub const BLS12_381_SCALAR_LEN: usize = 32;

mod fr;
pub use fr::*;

mod g1;
pub use g1::*;

mod g2;
pub use g2::*;

mod gt;
pub use gt::*;

mod pairing;
pub use pairing::*;

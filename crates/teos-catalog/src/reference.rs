//! Identifier coercion.
//!
//! Most commands accept either a rich object (a [`crate::KeyPair`], an
//! [`crate::Account`], a [`crate::Wallet`], a [`crate::Contract`]) or the
//! plain identifier string. Each capability is a small trait; strings
//! implement every one of them by returning themselves.

/// Something that can stand in for an account, wallet or key name.
pub trait Named {
    /// The name sent to the tool.
    fn name(&self) -> &str;
}

/// Something that carries a public key.
pub trait PublicKeyed {
    /// Public key in the tool's text format.
    fn public_key(&self) -> &str;
}

/// Something that carries a private key.
pub trait PrivateKeyed {
    /// Private key in WIF format.
    fn private_key(&self) -> &str;
}

/// Something that points at a contract source directory.
pub trait ContractSource {
    /// Contract directory, absolute or relative to the contract workspace.
    fn contract_dir(&self) -> &str;
}

macro_rules! impl_for_strings {
    ($($trait:ident :: $method:ident),* $(,)?) => {
        $(
            impl $trait for str {
                fn $method(&self) -> &str {
                    self
                }
            }

            impl $trait for String {
                fn $method(&self) -> &str {
                    self
                }
            }

            impl<T: $trait + ?Sized> $trait for &T {
                fn $method(&self) -> &str {
                    (**self).$method()
                }
            }
        )*
    };
}

impl_for_strings!(
    Named::name,
    PublicKeyed::public_key,
    PrivateKeyed::private_key,
    ContractSource::contract_dir,
);

/// Name of the wallet used when none is given.
pub const DEFAULT_WALLET: &str = "default";

#[cfg(test)]
mod tests {
    use super::*;

    struct Holder {
        name: String,
    }

    impl Named for Holder {
        fn name(&self) -> &str {
            &self.name
        }
    }

    fn coerce(value: &(impl Named + ?Sized)) -> String {
        value.name().to_string()
    }

    #[test]
    fn test_strings_return_themselves() {
        assert_eq!(coerce("alice"), "alice");
        assert_eq!(coerce(&String::from("bob")), "bob");
        assert_eq!("EOS6abc".public_key(), "EOS6abc");
        assert_eq!("5Kxyz".private_key(), "5Kxyz");
        assert_eq!("hello".contract_dir(), "hello");
    }

    #[test]
    fn test_objects_return_attribute() {
        let holder = Holder {
            name: "carol".into(),
        };
        assert_eq!(coerce(&holder), "carol");
        assert_eq!(coerce(&&holder), "carol");
    }
}

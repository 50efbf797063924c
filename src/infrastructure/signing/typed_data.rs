//! Typed structured-data hashing, signing and recovery over secp256k1.
//!
//! Every function here is synchronous. Signing is deterministic (RFC 6979)
//! and produces low-S signatures; recovery rejects high-S input.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use alloy_dyn_abi::TypedData;
use alloy_primitives::{hex, Address, Bytes, Signature, B256, U256};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;
use alloy_sol_types::Eip712Domain;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Map, Value};

use super::SigningError;

/// One named, typed member of a struct type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedField {
    pub name: String,
    pub kind: String,
}

/// Declared struct types a message is hashed against.
///
/// Field order is significant: it is the order members are encoded in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeSchema {
    types: BTreeMap<String, Vec<TypedField>>,
}

impl TypeSchema {
    /// Create an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a struct type given `(name, solidity type)` member pairs.
    #[must_use]
    pub fn with_type(mut self, name: &str, fields: &[(&str, &str)]) -> Self {
        let fields = fields
            .iter()
            .map(|(field, kind)| TypedField {
                name: (*field).to_string(),
                kind: (*kind).to_string(),
            })
            .collect();
        self.types.insert(name.to_string(), fields);
        self
    }

    /// Members of a declared type.
    #[must_use]
    pub fn fields(&self, name: &str) -> Option<&[TypedField]> {
        self.types.get(name).map(Vec::as_slice)
    }

    fn to_json(&self) -> Map<String, Value> {
        self.types
            .iter()
            .map(|(name, fields)| (name.clone(), fields_json(fields)))
            .collect()
    }
}

fn fields_json(fields: &[TypedField]) -> Value {
    Value::Array(
        fields
            .iter()
            .map(|f| json!({ "name": f.name, "type": f.kind }))
            .collect(),
    )
}

/// Build a domain separator with all four standard members.
#[must_use]
pub fn domain(
    name: impl Into<String>,
    version: impl Into<String>,
    chain_id: u64,
    verifying_contract: Address,
) -> Eip712Domain {
    Eip712Domain::new(
        Some(Cow::Owned(name.into())),
        Some(Cow::Owned(version.into())),
        Some(U256::from(chain_id)),
        Some(verifying_contract),
        None,
    )
}

/// Hash `message` as an instance of `primary_type` under `domain`.
///
/// # Errors
///
/// Returns [`SigningError::TypedData`] if the primary type is not declared
/// or the message does not match its schema.
pub fn hash_typed_data(
    domain: &Eip712Domain,
    schema: &TypeSchema,
    primary_type: &str,
    message: &Value,
) -> Result<B256, SigningError> {
    if schema.fields(primary_type).is_none() {
        return Err(SigningError::TypedData(format!(
            "primary type {primary_type} is not declared"
        )));
    }

    let (domain_value, domain_fields) = domain_json(domain);
    let mut types = schema.to_json();
    types.insert("EIP712Domain".to_string(), domain_fields);

    let document = json!({
        "types": types,
        "primaryType": primary_type,
        "domain": domain_value,
        "message": message,
    });
    let typed: TypedData = serde_json::from_value(document)
        .map_err(|e| SigningError::TypedData(e.to_string()))?;
    typed
        .eip712_signing_hash()
        .map_err(|e| SigningError::TypedData(e.to_string()))
}

fn domain_json(domain: &Eip712Domain) -> (Value, Value) {
    let mut value = Map::new();
    let mut fields = Vec::new();
    if let Some(name) = &domain.name {
        value.insert("name".into(), json!(name));
        fields.push(("name", "string"));
    }
    if let Some(version) = &domain.version {
        value.insert("version".into(), json!(version));
        fields.push(("version", "string"));
    }
    if let Some(chain_id) = &domain.chain_id {
        value.insert("chainId".into(), json!(chain_id.to_string()));
        fields.push(("chainId", "uint256"));
    }
    if let Some(contract) = &domain.verifying_contract {
        value.insert("verifyingContract".into(), json!(hex::encode_prefixed(contract)));
        fields.push(("verifyingContract", "address"));
    }
    if let Some(salt) = &domain.salt {
        value.insert("salt".into(), json!(salt.to_string()));
        fields.push(("salt", "bytes32"));
    }
    let fields = Value::Array(
        fields
            .into_iter()
            .map(|(name, kind)| json!({ "name": name, "type": kind }))
            .collect(),
    );
    (Value::Object(value), fields)
}

/// A 65-byte `r ‖ s ‖ v` signature with `v` in `{27, 28}`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature65([u8; 65]);

impl Signature65 {
    /// Parse from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`SigningError::InvalidSignature`] unless exactly 65 bytes are
    /// given.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, SigningError> {
        let raw: [u8; 65] = bytes.try_into().map_err(|_| {
            SigningError::InvalidSignature(format!("expected 65 bytes, got {}", bytes.len()))
        })?;
        Ok(Self(raw))
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 65] {
        &self.0
    }

    #[must_use]
    pub fn to_bytes(&self) -> Bytes {
        Bytes::copy_from_slice(&self.0)
    }
}

impl fmt::Display for Signature65 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode_prefixed(self.0))
    }
}

impl fmt::Debug for Signature65 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature65({self})")
    }
}

impl FromStr for Signature65 {
    type Err = SigningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|e| SigningError::InvalidSignature(e.to_string()))?;
        Self::from_slice(&bytes)
    }
}

impl Serialize for Signature65 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Signature65 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Sign a 32-byte digest.
///
/// # Errors
///
/// Returns [`SigningError::Sign`] if the signer rejects the digest.
pub fn sign_hash(hash: &B256, signer: &PrivateKeySigner) -> Result<Signature65, SigningError> {
    let signature = signer
        .sign_hash_sync(hash)
        .map_err(|e| SigningError::Sign(e.to_string()))?;
    Ok(Signature65(signature.as_bytes()))
}

/// Recover the address that signed `hash`.
///
/// # Errors
///
/// Returns [`SigningError::InvalidSignature`] for malformed or high-S
/// signatures and when recovery does not yield a usable address.
pub fn recover_from_hash(hash: &B256, signature: &[u8]) -> Result<Address, SigningError> {
    let signature65 = Signature65::from_slice(signature)?;
    let parsed = Signature::from_raw(signature65.as_bytes())
        .map_err(|e| SigningError::InvalidSignature(e.to_string()))?;
    if parsed.normalize_s().is_some() {
        return Err(SigningError::InvalidSignature("non-canonical high-S value".into()));
    }
    let address = parsed
        .recover_address_from_prehash(hash)
        .map_err(|e| SigningError::InvalidSignature(e.to_string()))?;
    if address == Address::ZERO {
        return Err(SigningError::InvalidSignature("recovered the zero address".into()));
    }
    Ok(address)
}

/// Recover the signer of a typed message.
///
/// # Errors
///
/// Returns [`SigningError::TypedData`] if the message cannot be hashed and
/// [`SigningError::InvalidSignature`] if recovery fails.
pub fn recover_signer(
    domain: &Eip712Domain,
    schema: &TypeSchema,
    primary_type: &str,
    message: &Value,
    signature: &[u8],
) -> Result<Address, SigningError> {
    let hash = hash_typed_data(domain, schema, primary_type, message)?;
    recover_from_hash(&hash, signature)
}

/// A private key bound to one signing domain.
pub struct TypedDataSigner {
    signer: PrivateKeySigner,
    domain: Eip712Domain,
}

impl TypedDataSigner {
    #[must_use]
    pub fn new(signer: PrivateKeySigner, domain: Eip712Domain) -> Self {
        Self { signer, domain }
    }

    /// Build from a hex-encoded private key.
    ///
    /// # Errors
    ///
    /// Returns [`SigningError::InvalidKey`] if the key does not parse or is
    /// not a valid scalar.
    pub fn from_hex_key(private_key: &str, domain: Eip712Domain) -> Result<Self, SigningError> {
        let signer = PrivateKeySigner::from_str(private_key.trim())
            .map_err(|e| SigningError::InvalidKey(e.to_string()))?;
        Ok(Self::new(signer, domain))
    }

    #[must_use]
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    #[must_use]
    pub const fn domain(&self) -> &Eip712Domain {
        &self.domain
    }

    /// Hash and sign a typed message under this signer's domain.
    ///
    /// # Errors
    ///
    /// Propagates hashing and signing failures.
    pub fn sign(
        &self,
        schema: &TypeSchema,
        primary_type: &str,
        message: &Value,
    ) -> Result<Signature65, SigningError> {
        let hash = hash_typed_data(&self.domain, schema, primary_type, message)?;
        sign_hash(&hash, &self.signer)
    }
}

impl fmt::Debug for TypedDataSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedDataSigner")
            .field("address", &self.address())
            .field("domain", &self.domain.name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_sol_types::{sol, SolStruct};

    sol! {
        struct Mail {
            address to;
            string contents;
            uint256 amount;
        }
    }

    fn schema() -> TypeSchema {
        TypeSchema::new().with_type(
            "Mail",
            &[("to", "address"), ("contents", "string"), ("amount", "uint256")],
        )
    }

    fn message(to: Address) -> Value {
        json!({ "to": hex::encode_prefixed(to), "contents": "hello", "amount": "42" })
    }

    fn test_domain() -> Eip712Domain {
        domain("Test", "1", 1, Address::repeat_byte(0x11))
    }

    #[test]
    fn dynamic_hash_matches_static_struct_hash() {
        let to = Address::repeat_byte(0x22);
        let static_hash = Mail {
            to,
            contents: "hello".into(),
            amount: U256::from(42),
        }
        .eip712_signing_hash(&test_domain());

        let dynamic = hash_typed_data(&test_domain(), &schema(), "Mail", &message(to)).unwrap();
        assert_eq!(dynamic, static_hash);
    }

    #[test]
    fn sign_then_recover_yields_signer_address() {
        let key = PrivateKeySigner::random();
        let signer = TypedDataSigner::new(key.clone(), test_domain());
        let msg = message(Address::repeat_byte(3));

        let signature = signer.sign(&schema(), "Mail", &msg).unwrap();
        let recovered =
            recover_signer(&test_domain(), &schema(), "Mail", &msg, signature.as_bytes()).unwrap();
        assert_eq!(recovered, key.address());
    }

    #[test]
    fn signing_is_deterministic_and_v_is_27_or_28() {
        let signer = PrivateKeySigner::random();
        let hash = B256::repeat_byte(0x42);
        let a = sign_hash(&hash, &signer).unwrap();
        let b = sign_hash(&hash, &signer).unwrap();
        assert_eq!(a, b);
        assert!(matches!(a.as_bytes()[64], 27 | 28));
    }

    #[test]
    fn tampered_message_recovers_a_different_address() {
        let key = PrivateKeySigner::random();
        let signer = TypedDataSigner::new(key.clone(), test_domain());
        let signature = signer
            .sign(&schema(), "Mail", &message(Address::repeat_byte(3)))
            .unwrap();

        let other = message(Address::repeat_byte(4));
        let recovered =
            recover_signer(&test_domain(), &schema(), "Mail", &other, signature.as_bytes());
        assert!(recovered.map_or(true, |a| a != key.address()));
    }

    #[test]
    fn malformed_signature_is_rejected() {
        let hash = B256::repeat_byte(1);
        assert!(matches!(
            recover_from_hash(&hash, &[0u8; 64]),
            Err(SigningError::InvalidSignature(_))
        ));
        assert!(recover_from_hash(&hash, &[0u8; 65]).is_err());
    }

    #[test]
    fn undeclared_primary_type_is_rejected() {
        let result = hash_typed_data(&test_domain(), &schema(), "Parcel", &json!({}));
        assert!(matches!(result, Err(SigningError::TypedData(_))));
    }

    #[test]
    fn signature_hex_round_trip() {
        let signature = sign_hash(&B256::ZERO, &PrivateKeySigner::random()).unwrap();
        let parsed: Signature65 = signature.to_string().parse().unwrap();
        assert_eq!(parsed, signature);
    }
}

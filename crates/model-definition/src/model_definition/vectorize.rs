//! Maps keyed by tuples cannot be written as JSON objects. These helpers store
//! them as a sequence of `(key, value)` pairs instead.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub fn serialize<'a, T, K, V, S>(target: T, ser: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: IntoIterator<Item = (&'a K, &'a V)>,
    K: Serialize + 'a,
    V: Serialize + 'a,
{
    ser.collect_seq(target)
}

pub fn deserialize<'de, T, K, V, D>(des: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromIterator<(K, V)>,
    K: Deserialize<'de>,
    V: Deserialize<'de>,
{
    let pairs: Vec<(K, V)> = Vec::deserialize(des)?;
    Ok(pairs.into_iter().collect())
}

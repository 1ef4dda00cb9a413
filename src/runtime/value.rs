use std::cell::RefCell;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{json, Value as Json};

use crate::error::{Error, Result};
use crate::parser::{Field, Statement};
use crate::runtime::Scope;

/// Host callable installed behind a `NativeFunction` value
pub type NativeFn = Rc<dyn Fn(&[Value], &Scope) -> Result<Value>>;

/// Runtime value representation
///
/// Primitives are held inline. Objects and arrays are shared and mutable, so
/// cloning a `Value` aliases the same collection the way a script sees it.
#[derive(Debug, Clone, Default)]
pub enum Value {
    // Primitives
    /// Null value
    #[default]
    Null,
    /// 64-bit floating-point number
    Number(f64),
    /// String value
    String(String),
    /// Boolean value
    Boolean(bool),

    // Collections
    /// Keyed object, possibly produced by a struct constructor
    Object(Rc<RefCell<ObjectData>>),
    /// Ordered array
    Array(Rc<RefCell<Vec<Value>>>),

    // Callables
    /// Struct descriptor; calling it builds a tagged object
    Struct(Rc<StructDescriptor>),
    /// Host-provided function
    NativeFunction(Rc<NativeFunction>),
    /// User function with its captured scope
    Function(Rc<FunctionValue>),
}

/// Object payload: insertion-ordered entries plus the originating struct name
#[derive(Debug, Clone, Default)]
pub struct ObjectData {
    entries: Vec<(String, Value)>,
    /// Set when the object was built by a struct constructor
    pub struct_name: Option<String>,
}

impl ObjectData {
    /// Creates an empty, untagged object
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a property
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Writes a property, keeping the position of an existing key
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Iterates entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of properties
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the object has no properties
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Named, ordered field template
#[derive(Debug, Clone, PartialEq)]
pub struct StructDescriptor {
    /// Struct name, used as the tag on instances
    pub name: String,
    /// Declared fields (non-empty)
    pub fields: Vec<Field>,
}

impl StructDescriptor {
    /// Binds positional arguments to fields, checking each declared type
    ///
    /// A field typed by another struct's name accepts an instance tagged with
    /// that name. Extra arguments are ignored.
    pub fn instantiate(&self, arguments: &[Value]) -> Result<Value> {
        let mut object = ObjectData::new();

        for (i, field) in self.fields.iter().enumerate() {
            let arg = arguments.get(i).ok_or_else(|| Error::MissingField {
                struct_name: self.name.clone(),
                field: field.name.clone(),
            })?;

            if arg.type_name() != field.type_name
                && arg.struct_name().as_deref() != Some(field.type_name.as_str())
            {
                return Err(Error::type_mismatch(format!(
                    "field `{}` of struct {} expects {}, got {} ({})",
                    field.name,
                    self.name,
                    field.type_name,
                    arg.type_name(),
                    arg
                )));
            }

            object.set(field.name.clone(), arg.clone());
        }

        object.struct_name = Some(self.name.clone());
        Ok(Value::Object(Rc::new(RefCell::new(object))))
    }
}

/// Host callable with the name it was registered under
pub struct NativeFunction {
    /// Registered name
    pub name: String,
    func: NativeFn,
}

impl NativeFunction {
    /// Wraps a host callable
    pub fn new(name: impl Into<String>, func: NativeFn) -> Self {
        NativeFunction {
            name: name.into(),
            func,
        }
    }

    /// Invokes the callable with evaluated arguments and the calling scope
    pub fn call(&self, arguments: &[Value], scope: &Scope) -> Result<Value> {
        (self.func)(arguments, scope)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "NativeFunction({})", self.name)
    }
}

/// User function value (closure)
pub struct FunctionValue {
    /// Declared name
    pub name: String,
    /// Parameter names, bound positionally
    pub parameters: Vec<String>,
    /// Body shared with the declaration node
    pub body: Rc<Vec<Statement>>,
    /// Captured scope; a live handle, never a copy
    closure: RefCell<Scope>,
}

impl FunctionValue {
    /// Creates a function capturing `closure`
    pub fn new(
        name: impl Into<String>,
        parameters: Vec<String>,
        body: Rc<Vec<Statement>>,
        closure: Scope,
    ) -> Self {
        FunctionValue {
            name: name.into(),
            parameters,
            body,
            closure: RefCell::new(closure),
        }
    }

    /// Scope the function body resolves free names against
    pub fn closure(&self) -> Scope {
        self.closure.borrow().clone()
    }

    /// Re-points the captured scope
    pub fn set_closure(&self, scope: Scope) {
        *self.closure.borrow_mut() = scope;
    }
}

impl fmt::Debug for FunctionValue {
    // The closure is skipped: it usually contains this function.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("FunctionValue")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

impl Value {
    /// Creates a string value
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    /// Creates an array value from a vector of values
    pub fn array(values: Vec<Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(values)))
    }

    /// Creates an object value from ordered entries
    pub fn object<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        let mut data = ObjectData::new();
        for (key, value) in entries {
            data.set(key, value);
        }
        Value::Object(Rc::new(RefCell::new(data)))
    }

    /// Wraps a host callable
    pub fn native<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&[Value], &Scope) -> Result<Value> + 'static,
    {
        Value::NativeFunction(Rc::new(NativeFunction::new(name, Rc::new(func))))
    }

    /// Kind name, as written in struct field types
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Number(_) => "Number",
            Value::String(_) => "String",
            Value::Boolean(_) => "Boolean",
            Value::Object(_) => "Object",
            Value::Array(_) => "Array",
            Value::Struct(_) => "Struct",
            Value::NativeFunction(_) => "NativeFunction",
            Value::Function(_) => "Function",
        }
    }

    /// Struct tag of an object built by a struct constructor
    pub fn struct_name(&self) -> Option<String> {
        match self {
            Value::Object(obj) => obj.borrow().struct_name.clone(),
            _ => None,
        }
    }

    /// Only numbers and booleans take part in arithmetic
    pub fn is_arithmetic(&self) -> bool {
        matches!(self, Value::Number(_) | Value::Boolean(_))
    }

    /// Returns true if the value is truthy in a boolean context
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Boolean(b) => *b,
            _ => true,
        }
    }

    /// Numeric coercion; strings parse after trimming, anything unparsable is NaN
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Null => 0.0,
            Value::Number(n) => *n,
            Value::Boolean(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    0.0
                } else {
                    trimmed.parse().unwrap_or(f64::NAN)
                }
            }
            _ => f64::NAN,
        }
    }

    /// Equality as `==` sees it
    ///
    /// Numbers and booleans compare numerically, strings by content (or
    /// numerically against a number), composites and callables by identity.
    pub fn loosely_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::String(_), b) | (b, Value::String(_)) if b.is_arithmetic() => {
                self.to_number() == other.to_number()
            }
            (a, b) if a.is_arithmetic() && b.is_arithmetic() => a.to_number() == b.to_number(),
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Struct(a), Value::Struct(b)) => Rc::ptr_eq(a, b),
            (Value::NativeFunction(a), Value::NativeFunction(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// `<` on raw values; strings compare lexicographically
    pub fn less_than(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::String(a), Value::String(b)) => a < b,
            _ => self.to_number() < other.to_number(),
        }
    }

    /// `>` on raw values; strings compare lexicographically
    pub fn greater_than(&self, other: &Value) -> bool {
        other.less_than(self)
    }

    /// Reads `self[key]`
    ///
    /// Missing object keys and out-of-range indices read as `Null`.
    pub fn get_member(&self, key: &Value) -> Result<Value> {
        match self {
            Value::Object(obj) => {
                let key = key.to_string();
                Ok(obj.borrow().get(&key).cloned().unwrap_or(Value::Null))
            }
            Value::Array(arr) => {
                let arr = arr.borrow();
                if is_length_key(key) {
                    return Ok(Value::Number(arr.len() as f64));
                }
                Ok(index_of(key)
                    .and_then(|i| arr.get(i).cloned())
                    .unwrap_or(Value::Null))
            }
            Value::String(s) => {
                if is_length_key(key) {
                    return Ok(Value::Number(s.chars().count() as f64));
                }
                Ok(index_of(key)
                    .and_then(|i| s.chars().nth(i))
                    .map(|c| Value::String(c.to_string()))
                    .unwrap_or(Value::Null))
            }
            other => Err(Error::type_mismatch(format!(
                "cannot read member `{}` of {} ({})",
                key,
                other.type_name(),
                other
            ))),
        }
    }

    /// Writes `self[key] = value`
    ///
    /// Array writes may replace an element or append at index `length`.
    pub fn set_member(&self, key: &Value, value: Value) -> Result<()> {
        match self {
            Value::Object(obj) => {
                // Rendering the key may borrow `obj` itself
                let key = key.to_string();
                obj.borrow_mut().set(key, value);
                Ok(())
            }
            Value::Array(arr) => {
                let index = index_of(key).ok_or_else(|| {
                    Error::type_mismatch(format!("array index must be a whole number, got {}", key))
                })?;
                let mut arr = arr.borrow_mut();
                match index.cmp(&arr.len()) {
                    Ordering::Less => arr[index] = value,
                    Ordering::Equal => arr.push(value),
                    Ordering::Greater => {
                        return Err(Error::type_mismatch(format!(
                            "array index {} is past the end (length {})",
                            key,
                            arr.len()
                        )))
                    }
                }
                Ok(())
            }
            other => Err(Error::type_mismatch(format!(
                "cannot assign member `{}` of {} ({})",
                key,
                other.type_name(),
                other
            ))),
        }
    }

    /// Converts the value into JSON for display
    fn to_json(&self, seen: &mut Vec<*const ()>) -> Json {
        match self {
            Value::Null => Json::Null,
            Value::Boolean(b) => Json::Bool(*b),
            Value::String(s) => Json::String(s.clone()),
            Value::Number(n) => number_to_json(*n),
            Value::Struct(descriptor) => Json::String(describe_struct(descriptor)),
            Value::NativeFunction(_) => json!({ "NativeFunction": true }),
            Value::Function(_) => json!({ "FunctionValue": true }),
            Value::Object(obj) => {
                let ptr = Rc::as_ptr(obj) as *const ();
                if seen.contains(&ptr) {
                    return Json::String("[Circular]".to_string());
                }
                seen.push(ptr);
                let map = obj
                    .borrow()
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_json(seen)))
                    .collect();
                seen.pop();
                Json::Object(map)
            }
            Value::Array(arr) => {
                let ptr = Rc::as_ptr(arr) as *const ();
                if seen.contains(&ptr) {
                    return Json::String("[Circular]".to_string());
                }
                seen.push(ptr);
                let items = arr.borrow().iter().map(|v| v.to_json(seen)).collect();
                seen.pop();
                Json::Array(items)
            }
        }
    }
}

lazy_static! {
    static ref QUOTED_KEY: Regex = Regex::new(r#""([^"]+)":"#).expect("static pattern");
}

/// JSON-like block with unquoted keys
fn render_composite(value: &Value) -> String {
    let json = value.to_json(&mut Vec::new());
    let pretty = serde_json::to_string_pretty(&json).unwrap_or_else(|_| json.to_string());
    QUOTED_KEY.replace_all(&pretty, "$1:").into_owned()
}

fn describe_struct(descriptor: &StructDescriptor) -> String {
    let mut out = String::from("{\n");
    for field in &descriptor.fields {
        out.push_str(&format!("\t{}: {}\n", field.name, field.type_name));
    }
    out.push('}');
    out
}

/// Numbers print without a trailing `.0` when integral
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n == f64::INFINITY {
        "Infinity".to_string()
    } else if n == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else {
        n.to_string()
    }
}

fn number_to_json(n: f64) -> Json {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        Json::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(Json::Number)
            .unwrap_or(Json::Null)
    }
}

fn is_length_key(key: &Value) -> bool {
    matches!(key, Value::String(s) if s == "length")
}

fn index_of(key: &Value) -> Option<usize> {
    let n = key.to_number();
    if n.is_finite() && n >= 0.0 && n.fract() == 0.0 && !matches!(key, Value::Null) {
        Some(n as usize)
    } else {
        None
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::String(s) => write!(f, "{}", s),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Object(_) | Value::Array(_) => write!(f, "{}", render_composite(self)),
            Value::Struct(descriptor) => write!(f, "{}", describe_struct(descriptor)),
            Value::NativeFunction(_) => write!(f, "[NativeFunction]"),
            Value::Function(_) => write!(f, "[Function]"),
        }
    }
}

// Structural for primitives and collections, identity for callables
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        structurally_equal(self, other, &mut Vec::new())
    }
}

/// Pairs already under comparison count as equal, so cycles terminate
fn structurally_equal(a: &Value, b: &Value, seen: &mut Vec<(*const (), *const ())>) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Number(a), Value::Number(b)) => a == b,
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Boolean(a), Value::Boolean(b)) => a == b,
        (Value::Array(x), Value::Array(y)) => {
            let pair = (Rc::as_ptr(x) as *const (), Rc::as_ptr(y) as *const ());
            if Rc::ptr_eq(x, y) || seen.contains(&pair) {
                return true;
            }
            seen.push(pair);
            let (x, y) = (x.borrow(), y.borrow());
            let equal = x.len() == y.len()
                && x.iter().zip(y.iter()).all(|(l, r)| structurally_equal(l, r, seen));
            seen.pop();
            equal
        }
        (Value::Object(x), Value::Object(y)) => {
            let pair = (Rc::as_ptr(x) as *const (), Rc::as_ptr(y) as *const ());
            if Rc::ptr_eq(x, y) || seen.contains(&pair) {
                return true;
            }
            seen.push(pair);
            let (x, y) = (x.borrow(), y.borrow());
            let equal = x.struct_name == y.struct_name
                && x.entries.len() == y.entries.len()
                && x.entries
                    .iter()
                    .zip(y.entries.iter())
                    .all(|((kl, vl), (kr, vr))| kl == kr && structurally_equal(vl, vr, seen));
            seen.pop();
            equal
        }
        (Value::Struct(a), Value::Struct(b)) => Rc::ptr_eq(a, b),
        (Value::NativeFunction(a), Value::NativeFunction(b)) => Rc::ptr_eq(a, b),
        (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point() -> StructDescriptor {
        StructDescriptor {
            name: "Point".to_string(),
            fields: vec![
                Field {
                    name: "x".to_string(),
                    type_name: "Number".to_string(),
                },
                Field {
                    name: "y".to_string(),
                    type_name: "Number".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Null.type_name(), "Null");
        assert_eq!(Value::Boolean(true).type_name(), "Boolean");
        assert_eq!(Value::Number(4.0).type_name(), "Number");
        assert_eq!(Value::string("a").type_name(), "String");
        assert_eq!(Value::array(vec![]).type_name(), "Array");
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Boolean(false).is_truthy());
        assert!(!Value::Number(0.0).is_truthy());
        assert!(!Value::Number(f64::NAN).is_truthy());
        assert!(!Value::string("").is_truthy());
        assert!(Value::string("0").is_truthy());
        assert!(Value::Number(-1.0).is_truthy());
        assert!(Value::array(vec![]).is_truthy());
    }

    #[test]
    fn test_arithmetic_eligibility() {
        assert!(Value::Number(1.0).is_arithmetic());
        assert!(Value::Boolean(false).is_arithmetic());
        assert!(!Value::Null.is_arithmetic());
        assert!(!Value::string("1").is_arithmetic());
        assert!(!Value::array(vec![]).is_arithmetic());
    }

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(Value::string(" 12 ").to_number(), 12.0);
        assert_eq!(Value::string("").to_number(), 0.0);
        assert!(Value::string("abc").to_number().is_nan());
        assert_eq!(Value::Boolean(true).to_number(), 1.0);
        assert_eq!(Value::Null.to_number(), 0.0);
    }

    #[test]
    fn test_number_display() {
        assert_eq!(Value::Number(7.0).to_string(), "7");
        assert_eq!(Value::Number(2.5).to_string(), "2.5");
        assert_eq!(Value::Number(-0.0).to_string(), "0");
        assert_eq!(Value::Number(f64::INFINITY).to_string(), "Infinity");
    }

    #[test]
    fn test_composite_display() {
        let obj = Value::object(vec![
            ("name", Value::string("Ada")),
            ("tags", Value::array(vec![Value::Number(1.0), Value::Boolean(true)])),
        ]);
        assert_eq!(
            obj.to_string(),
            "{\n  name: \"Ada\",\n  tags: [\n    1,\n    true\n  ]\n}"
        );
        assert_eq!(Value::array(vec![]).to_string(), "[]");
    }

    #[test]
    fn test_callable_display() {
        let native = Value::native("noop", |_, _| Ok(Value::Null));
        assert_eq!(native.to_string(), "[NativeFunction]");
        assert_eq!(
            Value::array(vec![native]).to_string(),
            "[\n  {\n    NativeFunction: true\n  }\n]"
        );
        assert_eq!(
            Value::Struct(Rc::new(point())).to_string(),
            "{\n\tx: Number\n\ty: Number\n}"
        );
    }

    #[test]
    fn test_self_referencing_array_display() {
        let arr = Value::array(vec![Value::Number(1.0)]);
        if let Value::Array(inner) = &arr {
            inner.borrow_mut().push(arr.clone());
        }
        assert!(arr.to_string().contains("[Circular]"));
    }

    #[test]
    fn test_loose_equality() {
        assert!(Value::Number(1.0).loosely_equals(&Value::Boolean(true)));
        assert!(Value::Number(3.0).loosely_equals(&Value::string("3")));
        assert!(Value::Null.loosely_equals(&Value::Null));
        assert!(!Value::Null.loosely_equals(&Value::Number(0.0)));

        let a = Value::array(vec![]);
        assert!(a.loosely_equals(&a.clone()));
        assert!(!a.loosely_equals(&Value::array(vec![])));
    }

    #[test]
    fn test_relational() {
        assert!(Value::string("apple").less_than(&Value::string("banana")));
        assert!(Value::Number(3.0).greater_than(&Value::Number(2.0)));
        assert!(!Value::Number(f64::NAN).less_than(&Value::Number(1.0)));
    }

    #[test]
    fn test_members() {
        let arr = Value::array(vec![Value::Number(10.0)]);
        assert_eq!(arr.get_member(&Value::Number(0.0)).unwrap(), Value::Number(10.0));
        assert_eq!(arr.get_member(&Value::Number(4.0)).unwrap(), Value::Null);
        assert_eq!(arr.get_member(&Value::string("length")).unwrap(), Value::Number(1.0));

        arr.set_member(&Value::Number(1.0), Value::Number(20.0)).unwrap();
        arr.set_member(&Value::Number(0.0), Value::Number(11.0)).unwrap();
        assert_eq!(arr.get_member(&Value::string("length")).unwrap(), Value::Number(2.0));
        assert_eq!(arr.get_member(&Value::Number(0.0)).unwrap(), Value::Number(11.0));

        let s = Value::string("héllo");
        assert_eq!(s.get_member(&Value::string("length")).unwrap(), Value::Number(5.0));
        assert_eq!(s.get_member(&Value::Number(1.0)).unwrap(), Value::string("é"));

        assert!(matches!(
            Value::Number(1.0).get_member(&Value::string("x")),
            Err(Error::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_array_write_past_end_faults() {
        let arr = Value::array(Vec::new());
        for index in [1.0, 1e11, 1e20, f64::MAX] {
            assert!(matches!(
                arr.set_member(&Value::Number(index), Value::Number(1.0)),
                Err(Error::TypeMismatch { .. })
            ));
        }
        assert_eq!(arr.get_member(&Value::string("length")).unwrap(), Value::Number(0.0));
    }

    #[test]
    fn test_object_keyed_by_itself() {
        let obj = Value::object(Vec::<(String, Value)>::new());
        obj.set_member(&obj, Value::Number(1.0)).unwrap();
        assert_eq!(obj.get_member(&obj).unwrap(), Value::Null);
        assert_eq!(obj.get_member(&Value::string("{}")).unwrap(), Value::Number(1.0));
    }

    #[test]
    fn test_cyclic_arrays_compare() {
        let a = Value::array(vec![Value::Number(1.0)]);
        let b = Value::array(vec![Value::Number(1.0)]);
        if let (Value::Array(x), Value::Array(y)) = (&a, &b) {
            x.borrow_mut().push(a.clone());
            y.borrow_mut().push(b.clone());
        }
        assert_eq!(a, b);

        let c = Value::array(vec![Value::Number(2.0)]);
        if let Value::Array(z) = &c {
            z.borrow_mut().push(c.clone());
        }
        assert_ne!(a, c);
    }

    #[test]
    fn test_object_aliasing() {
        let obj = Value::object(Vec::<(String, Value)>::new());
        let alias = obj.clone();
        alias.set_member(&Value::string("x"), Value::Number(1.0)).unwrap();
        assert_eq!(obj.get_member(&Value::string("x")).unwrap(), Value::Number(1.0));
        assert_eq!(obj.get_member(&Value::string("y")).unwrap(), Value::Null);
    }

    #[test]
    fn test_struct_instantiation() {
        let point = point();
        let p = point
            .instantiate(&[Value::Number(1.0), Value::Number(2.0)])
            .unwrap();
        assert_eq!(p.struct_name().as_deref(), Some("Point"));
        assert_eq!(p.get_member(&Value::string("y")).unwrap(), Value::Number(2.0));

        assert!(matches!(
            point.instantiate(&[Value::Number(1.0)]),
            Err(Error::MissingField { ref field, .. }) if field == "y"
        ));
        assert!(matches!(
            point.instantiate(&[Value::string("a"), Value::Number(2.0)]),
            Err(Error::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_struct_field_typed_by_struct_name() {
        let point = point();
        let line = StructDescriptor {
            name: "Line".to_string(),
            fields: vec![Field {
                name: "start".to_string(),
                type_name: "Point".to_string(),
            }],
        };

        let p = point
            .instantiate(&[Value::Number(0.0), Value::Number(0.0)])
            .unwrap();
        assert!(line.instantiate(&[p]).is_ok());
        assert!(line
            .instantiate(&[Value::object(vec![("x", Value::Number(0.0))])])
            .is_err());
    }
}

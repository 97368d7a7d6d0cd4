#[macro_use]
mod common;

#[cfg(test)]
mod field {
    tests! {
        method_shadowed_by_field in field is OK
        "method"
        "field"
    }

    tests! {
        per_instance in field is OK
        "1"
        "2"
    }

    tests! {
        function_field in field is OK
        "hello"
    }
}

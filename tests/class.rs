#[macro_use]
mod common;

#[cfg(test)]
mod class {
    tests! {
        print_class in class is OK
        "Cake"
    }

    tests! {
        print_instance in class is OK
        "Cake instance"
    }

    tests! {
        properties in class is OK
        "apple"
        "pear"
    }

    tests! {
        instances_are_distinct in class is OK
        "true"
        "false"
    }

    tests! {
        string_property in class is ERR
        "Only instances have properties."
        "[line 1]"
    }

    tests! {
        nil_field in class is ERR
        "Only instances have fields."
        "[line 1]"
    }

    tests! {
        undefined_property in class is ERR
        "Undefined property 'missing'."
        "[line 2]"
    }
}
